//! `.MAP` level file support.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size        Field
//! ------  ----------  ---------------------------------------------
//! 0x0000  4           magic "MAP\0"
//! 0x0004  4           reserved (u32)
//! 0x0008  1           render_with_light (u8)
//! 0x0009  4           base_walls_tileset (u32)
//! 0x000D  128*128     solid grid (u8 per cell, row-major by y)
//! 0x400D  128*128*2   floor grid (i16 per cell, row-major by y)
//! 0xC00D  ...         five sections, each a u32 count and its records:
//!                       mountains and stairs  (overlays)
//!                       shadows               (overlays)
//!                       buildings             (tiles)
//!                       objects               (tiles)
//!                       base walls            (tiles)
//! ```
//!
//! Overlay record (20 bytes): u16 frame, 2 padding, i32 x, i32 y, 8 padding.
//! The offset is in screen pixels.
//!
//! Tile record (4 bytes): u16 frame, u8 x, u8 y. The coordinate is a map cell.
//!
//! A floor value `>= 0` selects a frame of the base floor tileset, a negative
//! value selects frame `value & 0x7FFF` of the level's alternate floor tileset.

use std::fmt;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::file::reader::{ByteReader, Eof};
use crate::file::{FileError, MapError, ParseErrorKind};

/// MAP format constants.
pub mod constants {
	/// Signature at the start of every level file
	pub const MAGIC: [u8; 4] = *b"MAP\0";

	/// Map width in cells
	pub const WIDTH: usize = 128;

	/// Map height in cells
	pub const HEIGHT: usize = 128;

	/// Number of cells in each grid
	pub const CELLS: usize = WIDTH * HEIGHT;

	/// Size of an overlay record
	pub const OVERLAY_SIZE: usize = 20;

	/// Size of a tile record
	pub const TILE_SIZE: usize = 4;

	/// Mask applied to negative floor values
	pub const ALTERNATE_FLOOR_MASK: u16 = 0x7FFF;
}

/// Sprite placed at a pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Overlay {
	/// Tileset frame index
	pub frame: u16,
	/// Horizontal screen offset in pixels
	pub x: i32,
	/// Vertical screen offset in pixels
	pub y: i32,
}

/// Sprite placed on a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
	/// Tileset frame index
	pub frame: u16,
	/// Cell column
	pub x: u8,
	/// Cell row
	pub y: u8,
}

/// Floor tileset frame of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FloorFrame {
	/// Frame of the shared base floor tileset
	Base(u16),
	/// Frame of the level's alternate floor tileset
	Alternate(u16),
}

impl From<i16> for FloorFrame {
	fn from(value: i16) -> Self {
		let raw = value as u16;
		if value >= 0 {
			Self::Base(raw)
		} else {
			Self::Alternate(raw & constants::ALTERNATE_FLOOR_MASK)
		}
	}
}

/// Tile sections of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileLayer {
	/// Building tiles
	Buildings,
	/// Object tiles
	Objects,
	/// Base wall tiles
	BaseWalls,
}

/// Parsed level file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
	magic: [u8; 4],
	reserved: u32,
	render_with_light: u8,
	base_walls_tileset: u32,
	solid: Vec<u8>,
	floor: Vec<i16>,
	mountains: Vec<Overlay>,
	shadows: Vec<Overlay>,
	buildings: Vec<Tile>,
	objects: Vec<Tile>,
	base_walls: Vec<Tile>,
}

/// Wraps a read failure with the field being read.
fn field<'a, T>(
	reader: &mut ByteReader<'a>,
	name: &'static str,
	read: impl FnOnce(&mut ByteReader<'a>) -> Result<T, Eof>,
) -> Result<T, MapError> {
	read(reader).map_err(|eof| MapError::ParseError {
		field: name,
		offset: eof.offset,
		kind: ParseErrorKind::UnexpectedEof {
			needed: eof.needed,
			available: eof.available,
		},
	})
}

/// Reads a section count and checks that its records fit in the remaining data.
fn section_len(reader: &mut ByteReader<'_>, name: &'static str, record_size: usize) -> Result<usize, MapError> {
	let count = field(reader, name, ByteReader::read_u32)? as usize;
	let needed = count.saturating_mul(record_size);
	if needed > reader.remaining() {
		return Err(MapError::ParseError {
			field: name,
			offset: reader.position(),
			kind: ParseErrorKind::UnexpectedEof {
				needed,
				available: reader.remaining(),
			},
		});
	}
	debug!("map: {name}: {count} records");
	Ok(count)
}

fn read_overlays(reader: &mut ByteReader<'_>, name: &'static str) -> Result<Vec<Overlay>, MapError> {
	let count = section_len(reader, name, constants::OVERLAY_SIZE)?;
	(0..count)
		.map(|_| {
			field(reader, name, |r| {
				let frame = r.read_u16()?;
				r.skip(2)?;
				let x = r.read_i32()?;
				let y = r.read_i32()?;
				r.skip(8)?;
				Ok(Overlay {
					frame,
					x,
					y,
				})
			})
		})
		.collect()
}

fn read_tiles(reader: &mut ByteReader<'_>, name: &'static str) -> Result<Vec<Tile>, MapError> {
	let count = section_len(reader, name, constants::TILE_SIZE)?;
	(0..count)
		.map(|_| {
			let offset = reader.position();
			let tile = field(reader, name, |r| {
				Ok(Tile {
					frame: r.read_u16()?,
					x: r.read_u8()?,
					y: r.read_u8()?,
				})
			})?;
			if usize::from(tile.x) >= constants::WIDTH || usize::from(tile.y) >= constants::HEIGHT {
				return Err(MapError::ParseError {
					field: name,
					offset,
					kind: ParseErrorKind::CoordinateOutOfRange {
						x: tile.x,
						y: tile.y,
					},
				});
			}
			Ok(tile)
		})
		.collect()
}

impl File {
	/// Parses a level from memory.
	///
	/// # Errors
	///
	/// - [`MapError::BadSignature`] if the data does not start with `MAP\0`
	/// - [`MapError::ParseError`] if a field is cut short, a tile lies outside the
	///   grid, or bytes remain after the last section
	pub fn from_bytes(data: &[u8]) -> Result<Self, MapError> {
		let mut reader = ByteReader::new(data);

		let magic = field(&mut reader, "signature", ByteReader::array::<4>)?;
		if magic != constants::MAGIC {
			return Err(MapError::BadSignature {
				expected: constants::MAGIC,
				actual: magic,
			});
		}

		let reserved = field(&mut reader, "reserved", ByteReader::read_u32)?;
		let render_with_light = field(&mut reader, "render_with_light", ByteReader::read_u8)?;
		let base_walls_tileset = field(&mut reader, "base_walls_tileset", ByteReader::read_u32)?;
		debug!("map: render_with_light={render_with_light}, base_walls_tileset={base_walls_tileset}");

		let solid = field(&mut reader, "solid grid", |r| r.bytes(constants::CELLS))?.to_vec();
		let floor = field(&mut reader, "floor grid", |r| r.bytes(constants::CELLS * 2))?
			.chunks_exact(2)
			.map(|b| i16::from_le_bytes([b[0], b[1]]))
			.collect();

		let mountains = read_overlays(&mut reader, "mountains")?;
		let shadows = read_overlays(&mut reader, "shadows")?;
		let buildings = read_tiles(&mut reader, "buildings")?;
		let objects = read_tiles(&mut reader, "objects")?;
		let base_walls = read_tiles(&mut reader, "base_walls")?;

		if !reader.is_empty() {
			return Err(MapError::ParseError {
				field: "end of file",
				offset: reader.position(),
				kind: ParseErrorKind::TrailingBytes {
					remaining: reader.remaining(),
				},
			});
		}

		Ok(Self {
			magic,
			reserved,
			render_with_light,
			base_walls_tileset,
			solid,
			floor,
			mountains,
			shadows,
			buildings,
			objects,
			base_walls,
		})
	}

	/// Reads and parses the level file at `path`.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| FileError::io(path, e))?;
		debug!("map: parsing {}", path.display());
		Self::from_bytes(&data).map_err(|source| FileError::Map {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Returns the file signature.
	#[inline]
	pub fn magic(&self) -> [u8; 4] {
		self.magic
	}

	/// Returns the reserved header word.
	#[inline]
	pub fn reserved(&self) -> u32 {
		self.reserved
	}

	/// Returns the raw render-with-light flag.
	#[inline]
	pub fn render_with_light(&self) -> u8 {
		self.render_with_light
	}

	/// Returns the index of the base walls tileset used by the level.
	#[inline]
	pub fn base_walls_tileset(&self) -> u32 {
		self.base_walls_tileset
	}

	/// Returns the collision grid, row-major by y.
	#[inline]
	pub fn solid(&self) -> &[u8] {
		&self.solid
	}

	/// Returns the raw floor grid, row-major by y.
	#[inline]
	pub fn floor(&self) -> &[i16] {
		&self.floor
	}

	/// Returns the mountain and stair overlays.
	#[inline]
	pub fn mountains(&self) -> &[Overlay] {
		&self.mountains
	}

	/// Returns the shadow overlays.
	#[inline]
	pub fn shadows(&self) -> &[Overlay] {
		&self.shadows
	}

	/// Returns the building tiles.
	#[inline]
	pub fn buildings(&self) -> &[Tile] {
		&self.buildings
	}

	/// Returns the object tiles.
	#[inline]
	pub fn objects(&self) -> &[Tile] {
		&self.objects
	}

	/// Returns the base wall tiles.
	#[inline]
	pub fn base_walls(&self) -> &[Tile] {
		&self.base_walls
	}

	/// Returns the tiles of `layer`.
	pub fn tiles(&self, layer: TileLayer) -> &[Tile] {
		match layer {
			TileLayer::Buildings => &self.buildings,
			TileLayer::Objects => &self.objects,
			TileLayer::BaseWalls => &self.base_walls,
		}
	}

	fn cell(x: usize, y: usize) -> Option<usize> {
		(x < constants::WIDTH && y < constants::HEIGHT).then(|| y * constants::WIDTH + x)
	}

	/// Returns the collision value of cell (x, y).
	pub fn solid_at(&self, x: usize, y: usize) -> Option<u8> {
		Self::cell(x, y).map(|i| self.solid[i])
	}

	/// Returns the floor frame of cell (x, y).
	pub fn floor_at(&self, x: usize, y: usize) -> Option<FloorFrame> {
		Self::cell(x, y).map(|i| FloorFrame::from(self.floor[i]))
	}

	/// Returns the tile of `layer` placed on cell (x, y).
	///
	/// When several records share a cell the last one wins.
	pub fn tile_at(&self, layer: TileLayer, x: u8, y: u8) -> Option<&Tile> {
		self.tiles(layer).iter().rev().find(|t| t.x == x && t.y == y)
	}

	/// Returns a compact description of the level.
	pub fn summary(&self) -> Summary {
		Summary {
			render_with_light: self.render_with_light != 0,
			base_walls_tileset: self.base_walls_tileset,
			solid_cells: self.solid.iter().filter(|&&s| s != 0).count(),
			alternate_floor_cells: self.floor.iter().filter(|&&f| f < 0).count(),
			mountains: self.mountains.len(),
			shadows: self.shadows.len(),
			buildings: self.buildings.len(),
			objects: self.objects.len(),
			base_walls: self.base_walls.len(),
		}
	}
}

/// Section counts and flags of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
	/// Level is rendered with lighting
	pub render_with_light: bool,
	/// Base walls tileset index
	pub base_walls_tileset: u32,
	/// Cells with a non-zero collision value
	pub solid_cells: usize,
	/// Cells using the alternate floor tileset
	pub alternate_floor_cells: usize,
	/// Mountain and stair overlays
	pub mountains: usize,
	/// Shadow overlays
	pub shadows: usize,
	/// Building tiles
	pub buildings: usize,
	/// Object tiles
	pub objects: usize,
	/// Base wall tiles
	pub base_walls: usize,
}

impl fmt::Display for Summary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "render with light:     {}", self.render_with_light)?;
		writeln!(f, "base walls tileset:    {}", self.base_walls_tileset)?;
		writeln!(f, "solid cells:           {}", self.solid_cells)?;
		writeln!(f, "alternate floor cells: {}", self.alternate_floor_cells)?;
		writeln!(f, "mountains and stairs:  {}", self.mountains)?;
		writeln!(f, "shadows:               {}", self.shadows)?;
		writeln!(f, "buildings:             {}", self.buildings)?;
		writeln!(f, "objects:               {}", self.objects)?;
		write!(f, "base walls:            {}", self.base_walls)
	}
}
