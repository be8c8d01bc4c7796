//! MAP level parsing

use pak_rs::pak_types::file::map::{self, FloorFrame, TileLayer};
use pak_rs::pak_types::file::{FileError, MapError, ParseErrorKind};

const FIXED_SIZE: usize = 4 + 4 + 1 + 4 + map::constants::CELLS * 3;

fn level(buildings: &[(u16, u8, u8)]) -> Vec<u8> {
	let mut data = b"MAP\0".to_vec();
	data.extend_from_slice(&0u32.to_le_bytes());
	data.push(0);
	data.extend_from_slice(&2u32.to_le_bytes());
	data.extend(std::iter::repeat_n(1u8, map::constants::CELLS));
	for i in 0..map::constants::CELLS {
		let value: i16 = if i % 2 == 0 { i16::try_from(i % 100).unwrap() } else { -1 };
		data.extend_from_slice(&value.to_le_bytes());
	}

	// mountains: one overlay
	data.extend_from_slice(&1u32.to_le_bytes());
	data.extend_from_slice(&3u16.to_le_bytes());
	data.extend_from_slice(&[0; 2]);
	data.extend_from_slice(&(-64i32).to_le_bytes());
	data.extend_from_slice(&128i32.to_le_bytes());
	data.extend_from_slice(&[0; 8]);
	// shadows: none
	data.extend_from_slice(&0u32.to_le_bytes());
	// buildings
	data.extend_from_slice(&(buildings.len() as u32).to_le_bytes());
	for &(frame, x, y) in buildings {
		data.extend_from_slice(&frame.to_le_bytes());
		data.extend_from_slice(&[x, y]);
	}
	// objects and base walls: none
	data.extend_from_slice(&0u32.to_le_bytes());
	data.extend_from_slice(&0u32.to_le_bytes());
	data
}

#[test_log::test]
fn test_parse_level() {
	let level = map::File::from_bytes(&level(&[(7, 1, 2), (8, 127, 127)])).unwrap();

	assert_eq!(level.base_walls_tileset(), 2);
	assert_eq!(level.solid_at(127, 127), Some(1));
	assert_eq!(level.floor_at(0, 0), Some(FloorFrame::Base(0)));
	assert_eq!(level.floor_at(1, 0), Some(FloorFrame::Alternate(0x7FFF)));
	assert_eq!(level.mountains()[0].x, -64);
	assert_eq!(level.tile_at(TileLayer::Buildings, 127, 127).map(|t| t.frame), Some(8));

	let summary = level.summary();
	assert_eq!(summary.solid_cells, map::constants::CELLS);
	assert_eq!(summary.alternate_floor_cells, map::constants::CELLS / 2);
	assert_eq!(summary.buildings, 2);

	let json = serde_json::to_value(summary).unwrap();
	assert_eq!(json["base_walls_tileset"], 2);
	assert_eq!(json["render_with_light"], false);
}

#[test]
fn test_truncated_grid_never_reaches_sections() {
	let data = level(&[]);
	for cut in [20, 4 + 4 + 1 + 4 + map::constants::CELLS + 10, FIXED_SIZE - 1] {
		let err = map::File::from_bytes(&data[..cut]).unwrap_err();
		let MapError::ParseError {
			field,
			kind,
			..
		} = err
		else {
			panic!("expected a parse error, got {err}");
		};
		assert!(field.ends_with("grid"), "unexpected field {field}");
		assert!(matches!(kind, ParseErrorKind::UnexpectedEof { .. }));
	}
}

#[test]
fn test_truncated_section() {
	let data = level(&[(1, 2, 3)]);
	let err = map::File::from_bytes(&data[..data.len() - 10]).unwrap_err();
	assert!(matches!(
		err,
		MapError::ParseError {
			field: "buildings",
			..
		}
	));
}

#[test]
fn test_open_missing_and_invalid() {
	let dir = tempfile::tempdir().unwrap();

	let missing = dir.path().join("missing.map");
	assert!(matches!(map::File::open(&missing), Err(FileError::Io { .. })));

	let bogus = dir.path().join("bogus.map");
	std::fs::write(&bogus, b"PAK\0rest").unwrap();
	let err = map::File::open(&bogus).unwrap_err();
	assert!(matches!(
		err,
		FileError::Map {
			source: MapError::BadSignature { .. },
			..
		}
	));
	assert!(err.to_string().contains("bogus.map"));
}
