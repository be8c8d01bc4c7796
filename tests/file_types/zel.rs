//! ZEL sprite decoding

use pak_rs::pak_types::file::{Color, DecodeOptions, FileError, FileType, FrameError, Palette, ZelError, zel};

use crate::container;

fn palette() -> Palette {
	let mut raw = vec![0u8; Palette::FILE_SIZE];
	raw[5 * 4..5 * 4 + 4].copy_from_slice(&[10, 20, 30, 0]);
	raw[8 * 4..8 * 4 + 4].copy_from_slice(&[40, 50, 60, 0]);
	Palette::from_bytes(&raw).unwrap()
}

#[test]
fn test_reference_frames() {
	let palette = palette();
	let options = DecodeOptions::default();

	let frame = zel::decode_frame(&[0x01, 0x00, 0x01, 0x00, 0x01, 0x10, 0x05], &palette, &options).unwrap();
	assert_eq!(frame.pixels(), &[Color::rgb(10, 20, 30)]);

	let frame = zel::decode_frame(&[0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00], &palette, &options).unwrap();
	assert_eq!(frame.pixels(), &[Color::TRANSPARENT]);
	assert_eq!(frame.to_rgba(), vec![0, 0, 0, 0]);
}

#[test_log::test]
fn test_open_reports_path_and_frame() {
	let dir = tempfile::tempdir().unwrap();
	let good: Vec<u8> = vec![0x01, 0x00, 0x01, 0x00, 0x01, 0x10, 0x05];
	// 1x1 frame emitting two transparent pixels
	let bad: Vec<u8> = vec![0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00];
	let path = dir.path().join("broken.zel");
	std::fs::write(&path, container(&[&good, &bad])).unwrap();

	let err = zel::File::open(&path, &palette(), &DecodeOptions::default()).unwrap_err();
	assert_eq!(err.file_type(), Some(FileType::Zel));
	assert_eq!(err.path(), path.as_path());
	match err {
		FileError::Zel {
			source,
			..
		} => {
			assert_eq!(source.frame_index(), Some(1));
			assert!(matches!(
				source,
				ZelError::Frame {
					count: 2,
					source: FrameError::PixelOverflow { .. },
					..
				}
			));
		}
		other => panic!("unexpected error: {other}"),
	}

	let ok_path = dir.path().join("fine.zel");
	std::fs::write(&ok_path, container(&[&good, &[], &good])).unwrap();
	let sprite = zel::File::open(&ok_path, &palette(), &DecodeOptions::default()).unwrap();
	assert_eq!(sprite.len(), 3);
	assert_eq!(sprite.frame(1).map(|f| (f.width(), f.height())), Some((1, 1)));
}

#[test]
fn test_open_rejects_non_container() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("junk.zel");
	std::fs::write(&path, b"junk").unwrap();

	let err = zel::File::open(&path, &palette(), &DecodeOptions::default()).unwrap_err();
	assert!(matches!(
		err,
		FileError::Archive {
			file_type: FileType::Zel,
			..
		}
	));
}

#[test]
fn test_shadow_tileset_uses_constant_palette_entry() {
	let dir = tempfile::tempdir().unwrap();
	let tilesets = dir.path().join("X").join("tilesets");
	std::fs::create_dir_all(&tilesets).unwrap();
	let path = tilesets.join("tileset_4_shadows.zel");
	// 2x1 frame with a constant run of 2 and no index bytes
	std::fs::write(&path, container(&[&[0x02, 0x00, 0x01, 0x00, 0x02, 0x10, 0x00, 0x00]])).unwrap();

	let options = DecodeOptions::default().for_path(&path);
	assert!(options.constant_pixels);
	let sprite = zel::File::open(&path, &palette(), &options).unwrap();
	assert!(sprite.frames()[0].pixels().iter().all(|&c| c == Color::rgb(40, 50, 60)));
}

#[test]
fn test_options_from_json() {
	let options: DecodeOptions = serde_json::from_str(r#"{ "max_width": 2, "max_height": 2 }"#).unwrap();
	let data = [0x03, 0x00, 0x01, 0x00, 0x00, 0x00];
	assert!(matches!(
		zel::decode_frame(&data, &palette(), &options),
		Err(FrameError::FrameTooLarge {
			max_width: 2,
			..
		})
	));
}
