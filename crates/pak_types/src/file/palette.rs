//! Palette support.
//!
//! ZEL sprites store 8-bit palette indices. The game ships its palette as a flat
//! table of 256 RGBA entries (1024 bytes); the alpha channel is ignored and every
//! palette colour is opaque. When no palette file is available, the Plan 9
//! 256-colour palette is used as a fallback.

use std::fmt;
use std::path::Path;

use log::warn;

use crate::file::{FileError, PaletteError};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Transparent sentinel used for pixels that carry no colour.
	///
	/// Palette colours are always opaque, so this value never collides with one.
	pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a new grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Returns true if this is the transparent sentinel.
	#[inline]
	pub const fn is_transparent(&self) -> bool {
		self.a == 0
	}

	/// Returns the color as `[r, g, b, a]`.
	#[inline]
	pub const fn to_array(&self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::TRANSPARENT
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// 256-entry opaque color palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; 256],
}

impl Palette {
	/// Total palette size
	pub const PALETTE_SIZE: usize = 256;

	/// Size of a palette file in bytes (256 colors × RGBA)
	pub const FILE_SIZE: usize = Self::PALETTE_SIZE * 4;

	/// Loads a palette from a flat RGBA table file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| FileError::io(path, e))?;
		Self::from_bytes(&data).map_err(|source| FileError::Palette {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Loads a palette from a byte slice.
	///
	/// The slice must hold exactly 256 entries of 4 bytes each (R, G, B, A).
	/// Alpha is ignored and forced to fully opaque.
	pub fn from_bytes(data: &[u8]) -> Result<Self, PaletteError> {
		if data.len() != Self::FILE_SIZE {
			return Err(PaletteError::InvalidLength {
				expected: Self::FILE_SIZE,
				actual: data.len(),
			});
		}

		let mut colors = [Color::TRANSPARENT; 256];
		for (color, rgba) in colors.iter_mut().zip(data.chunks_exact(4)) {
			*color = Color::rgb(rgba[0], rgba[1], rgba[2]);
		}

		Ok(Self {
			colors,
		})
	}

	/// Loads the palette at `path`, or the Plan 9 fallback if no path is given.
	pub fn load_or_fallback(path: Option<&Path>) -> Result<Self, FileError> {
		match path {
			Some(path) => Self::from_file(path),
			None => {
				warn!("using fallback Plan 9 palette; supply a palette file for accurate colours");
				Ok(Self::plan9())
			}
		}
	}

	/// Builds the Plan 9 256-colour palette.
	///
	/// The palette is a 4×4×4 RGB cube where each cube cell is split into four
	/// intensity levels, which gives a reasonable spread for previewing sprites
	/// when the game palette is not at hand.
	pub fn plan9() -> Self {
		let mut colors = [Color::TRANSPARENT; 256];
		let mut i = 0usize;
		for r in 0..4i32 {
			for v in 0..4i32 {
				let mut j = v - r;
				for g in 0..4i32 {
					for b in 0..4i32 {
						let den = r.max(g).max(b);
						let color = if den == 0 {
							Color::gray((0x11 * v) as u8)
						} else {
							let num = 17 * (4 * den + v);
							Color::rgb((r * num / den) as u8, (g * num / den) as u8, (b * num / den) as u8)
						};
						colors[i + (j & 0x0F) as usize] = color;
						j += 1;
					}
				}
				i += 16;
			}
		}

		Self {
			colors,
		}
	}

	/// Creates a grayscale palette where each entry matches its index.
	pub fn grayscale() -> Self {
		let mut colors = [Color::TRANSPARENT; 256];
		for (i, color) in colors.iter_mut().enumerate() {
			*color = Color::gray(i as u8);
		}
		Self {
			colors,
		}
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Sets a color at the specified index.
	///
	/// Palette colours are always opaque; the alpha component is ignored.
	#[inline]
	pub fn set(&mut self, index: u8, color: Color) {
		self.colors[index as usize] = Color::rgb(color.r, color.g, color.b);
	}

	/// Returns a reference to the color array.
	#[inline]
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::plan9()
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_color_rgb() {
		let color = Color::rgb(255, 128, 64);
		assert_eq!(color.a, 255);
		assert!(!color.is_transparent());
		assert!(Color::TRANSPARENT.is_transparent());
	}

	#[test]
	fn test_palette_from_bytes_forces_opaque() {
		let mut data = vec![0u8; Palette::FILE_SIZE];
		data[5 * 4..5 * 4 + 4].copy_from_slice(&[10, 20, 30, 0]);
		data[255 * 4..].copy_from_slice(&[1, 2, 3, 0x7F]);

		let palette = Palette::from_bytes(&data).unwrap();
		assert_eq!(palette.get(5), Color::rgb(10, 20, 30));
		assert_eq!(palette[255], Color::rgb(1, 2, 3));
		assert!(palette.colors().iter().all(|c| c.a == 255));
	}

	#[test]
	fn test_palette_invalid_length() {
		let err = Palette::from_bytes(&[0u8; 320]).unwrap_err();
		assert_eq!(
			err,
			PaletteError::InvalidLength {
				expected: 1024,
				actual: 320,
			}
		);
	}

	#[test]
	fn test_plan9_corners() {
		let palette = Palette::plan9();
		assert_eq!(palette.get(0), Color::rgb(0, 0, 0));
		assert_eq!(palette.get(255), Color::rgb(255, 255, 255));
		// r=0, v=0, g=0, b=1 lands at index 1 with full blue intensity
		assert_eq!(palette.get(1), Color::rgb(0, 0, 68));
		assert!(palette.colors().iter().all(|c| c.a == 255));
	}

	#[test]
	fn test_palette_set_ignores_alpha() {
		let mut palette = Palette::grayscale();
		palette.set(42, Color::new(1, 2, 3, 0));
		assert_eq!(palette.get(42), Color::rgb(1, 2, 3));
		assert_eq!(palette.get(128), Color::gray(128));
	}
}
