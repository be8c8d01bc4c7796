//! `.ZEL` sprite format support.
//!
//! A ZEL file is a PAK container whose blobs are frames. Each frame starts with
//! its dimensions followed by a run-based command stream of palette indices; see
//! [`decode_frame`] for the command set.
//!
//! # Examples
//!
//! ```no_run
//! use pak_types::file::{Palette, zel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let palette = Palette::plan9();
//! let options = zel::DecodeOptions::default();
//! let sprite = zel::File::open("X/tilesets/tileset_1_buildings.zel", &palette, &options)?;
//!
//! for (i, frame) in sprite.iter().enumerate() {
//!     println!("frame {i}: {frame}");
//! }
//! # Ok(())
//! # }
//! ```

mod decode;
mod frame;


use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

pub use decode::decode_frame;
pub use frame::Frame;

use crate::file::pak::Archive;
use crate::file::{FileError, FileType, Palette, ZelError};

/// ZEL decoding constants.
pub mod constants {
	/// Default upper bound on frame width
	pub const MAX_WIDTH: u16 = 1280;

	/// Default upper bound on frame height
	pub const MAX_HEIGHT: u16 = 1280;

	/// Number of numbered shadow tilesets shipped with the game
	pub const SHADOW_TILESET_COUNT: u32 = 17;
}

mod opcodes {
	pub const END: u16 = 0x0000;
	pub const CLEAR_LINE: u16 = 0x8000;
	pub const TRANSPARENT_LINES: u16 = 0x4000;
	pub const PIXEL_RUN: u16 = 0x1000;
	pub const COUNT_MASK: u16 = 0x0FFF;

	/// Palette entry emitted by pixel runs of the constant variant
	pub const CONSTANT_PALETTE_INDEX: u8 = 8;
}

/// Decoder configuration.
///
/// Can be loaded from JSON; missing fields take their default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
	/// Largest accepted frame width
	pub max_width: u16,
	/// Largest accepted frame height
	pub max_height: u16,
	/// Pixel runs emit palette entry 8 instead of reading index bytes
	pub constant_pixels: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_width: constants::MAX_WIDTH,
			max_height: constants::MAX_HEIGHT,
			constant_pixels: false,
		}
	}
}

impl DecodeOptions {
	/// Sets the maximum frame dimensions.
	pub fn with_max_size(mut self, max_width: u16, max_height: u16) -> Self {
		self.max_width = max_width;
		self.max_height = max_height;
		self
	}

	/// Enables or disables the constant-pixel variant.
	pub fn with_constant_pixels(mut self, constant_pixels: bool) -> Self {
		self.constant_pixels = constant_pixels;
		self
	}

	/// Returns the options to use for the file at `path`, enabling the constant
	/// variant for shadow tilesets.
	pub fn for_path<P: AsRef<Path>>(self, path: P) -> Self {
		let constant_pixels = self.constant_pixels || is_shadow_tileset_path(path);
		self.with_constant_pixels(constant_pixels)
	}
}

/// Reports whether `path` names one of the shadow tilesets
/// (`X/tilesets/tileset_N_shadows.zel`, N in 1..=17), whose pixel runs use the
/// constant variant.
///
/// Both `/` and `\` separators are accepted; anything may precede the `X`
/// directory.
pub fn is_shadow_tileset_path<P: AsRef<Path>>(path: P) -> bool {
	let normalized = path.as_ref().to_string_lossy().replace('\\', "/");
	let mut components = normalized.rsplit('/');
	let (Some(name), Some("tilesets"), Some("X")) = (components.next(), components.next(), components.next())
	else {
		return false;
	};

	name.strip_prefix("tileset_")
		.and_then(|rest| rest.strip_suffix("_shadows.zel"))
		.filter(|n| !n.starts_with('0'))
		.and_then(|n| n.parse::<u32>().ok())
		.is_some_and(|n| (1..=constants::SHADOW_TILESET_COUNT).contains(&n))
}

/// Decodes every frame of a sprite file in order.
///
/// Decoding stops at the first failing frame.
pub fn decode_all(data: &[u8], palette: &Palette, options: &DecodeOptions) -> Result<Vec<Frame>, ZelError> {
	let archive = Archive::parse(data)?;
	let count = archive.len();
	debug!("zel: {count} frames, constant pixels: {}", options.constant_pixels);

	archive
		.blobs()
		.map(|blob| {
			decode_frame(blob.data(), palette, options).map_err(|source| ZelError::Frame {
				index: blob.index(),
				count,
				source,
			})
		})
		.collect()
}

/// Decoded sprite file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	frames: Vec<Frame>,
}

impl File {
	/// Decodes a sprite file from memory.
	pub fn from_bytes(data: &[u8], palette: &Palette, options: &DecodeOptions) -> Result<Self, ZelError> {
		Ok(Self {
			frames: decode_all(data, palette, options)?,
		})
	}

	/// Reads and decodes the sprite file at `path`.
	///
	/// `options` are used as given; combine with [`DecodeOptions::for_path`] to pick
	/// the constant variant from the file name.
	pub fn open<P: AsRef<Path>>(path: P, palette: &Palette, options: &DecodeOptions) -> Result<Self, FileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| FileError::io(path, e))?;
		debug!("zel: parsing {}", path.display());

		Self::from_bytes(&data, palette, options).map_err(|source| match source {
			ZelError::Archive(source) => FileError::Archive {
				file_type: FileType::Zel,
				path: path.to_path_buf(),
				source,
			},
			source @ ZelError::Frame {
				..
			} => FileError::Zel {
				path: path.to_path_buf(),
				source,
			},
		})
	}

	/// Returns the decoded frames.
	#[inline]
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Consumes the file and returns its frames.
	pub fn into_frames(self) -> Vec<Frame> {
		self.frames
	}

	/// Returns frame `index`, or `None` if out of range.
	pub fn frame(&self, index: usize) -> Option<&Frame> {
		self.frames.get(index)
	}

	/// Returns the number of frames.
	#[inline]
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns true if the file holds no frames.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns an iterator over the frames.
	pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
		self.frames.iter()
	}

	/// Returns the pixel size of a sprite sheet laying the frames out in a grid of
	/// `columns` columns, each cell as large as the largest frame.
	///
	/// Returns `(0, 0)` for an empty file or zero columns.
	pub fn sprite_sheet_dimensions(&self, columns: usize) -> (u32, u32) {
		if self.frames.is_empty() || columns == 0 {
			return (0, 0);
		}
		let (cell_width, cell_height) = self.max_frame_size();
		let columns = columns.min(self.frames.len());
		let rows = self.frames.len().div_ceil(columns);
		(cell_width * columns as u32, cell_height * rows as u32)
	}

	/// Returns the largest width and height over all frames.
	pub fn max_frame_size(&self) -> (u32, u32) {
		self.frames.iter().fold((0, 0), |(w, h), frame| {
			(w.max(u32::from(frame.width())), h.max(u32::from(frame.height())))
		})
	}
}

impl<'a> IntoIterator for &'a File {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
