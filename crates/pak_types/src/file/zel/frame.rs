//! Decoded ZEL frame.

use std::fmt;

use crate::file::Color;

/// One decoded still image of a sprite.
///
/// Pixels are stored row-major from the top-left corner. Every pixel is either an
/// opaque palette colour or [`Color::TRANSPARENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	width: u16,
	height: u16,
	pixels: Vec<Color>,
}

impl Frame {
	/// Creates a fully transparent frame.
	pub fn transparent(width: u16, height: u16) -> Self {
		Self {
			width,
			height,
			pixels: vec![Color::TRANSPARENT; usize::from(width) * usize::from(height)],
		}
	}

	/// Returns the 1×1 transparent frame substituted for empty frame data.
	pub fn placeholder() -> Self {
		Self::transparent(1, 1)
	}

	/// Returns the frame's width.
	#[inline]
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the frame's height.
	#[inline]
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns the total number of pixels in this frame.
	#[inline]
	pub fn pixel_count(&self) -> usize {
		self.pixels.len()
	}

	/// Returns the pixels in row-major order.
	#[inline]
	pub fn pixels(&self) -> &[Color] {
		&self.pixels
	}

	pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
		&mut self.pixels
	}

	/// Returns the pixel at (x, y), or `None` if out of bounds.
	pub fn get(&self, x: u16, y: u16) -> Option<Color> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(usize::from(y) * usize::from(self.width) + usize::from(x)).copied()
	}

	/// Returns the number of opaque pixels.
	pub fn opaque_count(&self) -> usize {
		self.pixels.iter().filter(|c| !c.is_transparent()).count()
	}

	/// Returns an iterator over the rows of the frame, top to bottom.
	pub fn rows(&self) -> std::slice::ChunksExact<'_, Color> {
		self.pixels.chunks_exact(usize::from(self.width))
	}

	/// Converts the frame to RGBA8 bytes, row-major.
	pub fn to_rgba(&self) -> Vec<u8> {
		self.pixels.iter().flat_map(Color::to_array).collect()
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{} ({} opaque)", self.width, self.height, self.opaque_count())
	}
}
