//! ZEL frame decompression.
//!
//! ## Frame Layout
//!
//! | Offset | Size | Field    | Description                    |
//! |--------|------|----------|--------------------------------|
//! | 0x00   | 2    | `width`  | Frame width in pixels          |
//! | 0x02   | 2    | `height` | Frame height in pixels         |
//! | 0x04   | ...  | commands | Little-endian u16 command words |
//!
//! ## Commands
//!
//! | Bits     | Operation                                                   |
//! |----------|-------------------------------------------------------------|
//! | `0x0000` | End of frame                                                |
//! | `0x4000` | Transparent lines: `n * width` transparent pixels           |
//! | `0x1000` | Pixel run: `n` palette index bytes follow                   |
//! | neither  | Transparent run: `n` transparent pixels                     |
//! | `0x8000` | Clear line: must land on a row boundary after the operation |
//!
//! `n` is always `command & 0x0FFF`. `0x4000` takes precedence over `0x1000`.
//!
//! Pixels are written left to right starting at the top-left corner, wrapping to
//! the next row at `width`. Pixels that are never written stay transparent.
//!
//! In the constant variant (shadow tilesets) a pixel run carries no index bytes
//! and every pixel is palette entry 8.

use log::{debug, warn};

use super::{DecodeOptions, Frame, opcodes};
use crate::file::reader::{ByteReader, Eof};
use crate::file::{Color, FrameError, Palette, Violation};

impl From<Eof> for FrameError {
	fn from(eof: Eof) -> Self {
		FrameError::TruncatedStream {
			offset: eof.offset,
			needed: eof.needed,
			available: eof.available,
		}
	}
}

/// State of the decoder for a single frame
#[derive(Debug)]
struct DecoderState<'a> {
	reader: ByteReader<'a>,
	palette: &'a Palette,
	constant_pixels: bool,
	frame: Frame,
	width: usize,
	capacity: usize,
	total: usize,
}

impl<'a> DecoderState<'a> {
	fn new(reader: ByteReader<'a>, frame: Frame, palette: &'a Palette, options: &DecodeOptions) -> Self {
		let width = usize::from(frame.width());
		let capacity = frame.pixel_count();
		Self {
			reader,
			palette,
			constant_pixels: options.constant_pixels,
			frame,
			width,
			capacity,
			total: 0,
		}
	}

	fn decode(mut self) -> Result<Frame, FrameError> {
		loop {
			let offset = self.reader.position();
			if self.reader.is_empty() {
				debug!("frame: stream ended without terminator at offset {offset}");
				break;
			}

			let command = self.reader.read_u16()?;
			if command == opcodes::END {
				let rest = self.reader.rest();
				if !rest.is_empty() {
					warn!(
						"frame: {} unprocessed bytes after terminator at offset {}:\n{}",
						rest.len(),
						self.reader.position(),
						hex_dump(rest)
					);
				}
				break;
			}

			self.execute(offset, command)?;
		}

		Ok(self.frame)
	}

	fn execute(&mut self, offset: usize, command: u16) -> Result<(), FrameError> {
		let n = command & opcodes::COUNT_MASK;
		let violated = |violation| FrameError::FormatViolation {
			offset,
			command,
			violation,
		};

		if command & opcodes::TRANSPARENT_LINES != 0 {
			self.skip(usize::from(n) * self.width)?;
		} else {
			self.reserve(usize::from(n))?;
			let width = self.frame.width();
			if n > width {
				return Err(violated(Violation::RunExceedsWidth {
					run: n,
					width,
				}));
			}

			if command & opcodes::PIXEL_RUN == 0 {
				self.skip(usize::from(n))?;
			} else if self.constant_pixels {
				let color = self.palette[opcodes::CONSTANT_PALETTE_INDEX];
				self.fill(usize::from(n), color)?;
			} else {
				let indices = self.reader.bytes(usize::from(n))?;
				let start = self.total;
				let palette = self.palette;
				for (pixel, &index) in self.frame.pixels_mut()[start..start + indices.len()].iter_mut().zip(indices) {
					*pixel = palette[index];
				}
				self.total += indices.len();
			}
		}

		if command & opcodes::CLEAR_LINE != 0 && self.total % self.width != 0 {
			return Err(violated(Violation::ClearLineMisaligned {
				total: self.total,
				width: self.frame.width(),
			}));
		}

		Ok(())
	}

	/// Checks that `count` more pixels fit into the frame.
	fn reserve(&self, count: usize) -> Result<(), FrameError> {
		let total = self.total + count;
		if total > self.capacity {
			return Err(FrameError::PixelOverflow {
				total,
				width: self.frame.width(),
				height: self.frame.height(),
			});
		}
		Ok(())
	}

	/// Emits `count` transparent pixels.
	fn skip(&mut self, count: usize) -> Result<(), FrameError> {
		self.reserve(count)?;
		self.total += count;
		Ok(())
	}

	fn fill(&mut self, count: usize, color: Color) -> Result<(), FrameError> {
		self.reserve(count)?;
		let start = self.total;
		self.frame.pixels_mut()[start..start + count].fill(color);
		self.total += count;
		Ok(())
	}
}

/// Decodes a single frame.
///
/// Empty frame data yields a 1×1 transparent placeholder.
///
/// # Errors
///
/// - [`FrameError::TruncatedStream`] if the data ends inside the dimensions, a
///   command word or the index bytes of a pixel run
/// - [`FrameError::FrameTooLarge`] if a dimension is zero or above the configured maximum
/// - [`FrameError::FormatViolation`] if a command breaks a structural rule
/// - [`FrameError::PixelOverflow`] if the commands emit more pixels than the frame holds,
///   checked ahead of the run-length rule
pub fn decode_frame(data: &[u8], palette: &Palette, options: &DecodeOptions) -> Result<Frame, FrameError> {
	if data.is_empty() {
		warn!("frame: empty frame data, substituting 1x1 placeholder");
		return Ok(Frame::placeholder());
	}

	let mut reader = ByteReader::new(data);
	let width = reader.read_u16()?;
	let height = reader.read_u16()?;

	if width == 0 || height == 0 || width > options.max_width || height > options.max_height {
		return Err(FrameError::FrameTooLarge {
			width,
			height,
			max_width: options.max_width,
			max_height: options.max_height,
		});
	}
	debug!("frame: {width}x{height}, {} bytes", data.len());

	DecoderState::new(reader, Frame::transparent(width, height), palette, options).decode()
}

/// Formats bytes as offset-prefixed rows of 16 hex bytes.
fn hex_dump(data: &[u8]) -> String {
	data.chunks(16)
		.enumerate()
		.map(|(row, chunk)| format!("{:08x}  {}", row * 16, hex::encode(chunk)))
		.collect::<Vec<_>>()
		.join("\n")
}
