//! Little-endian cursor over a borrowed byte slice.
//!
//! All formats in this crate are fully buffered before decoding, so reads never
//! touch I/O. A failed read reports where it started and how many bytes were
//! missing, and leaves the cursor untouched.

/// Read past the end of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Eof {
	/// Offset where the read started
	pub offset: usize,
	/// Number of bytes requested
	pub needed: usize,
	/// Number of bytes left
	pub available: usize,
}

/// Byte cursor reading little-endian primitives
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> ByteReader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
		}
	}

	/// Current offset from the start of the buffer.
	#[inline]
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Number of unread bytes.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Unread tail of the buffer.
	pub fn rest(&self) -> &'a [u8] {
		&self.data[self.pos..]
	}

	/// Borrows the next `len` bytes and advances past them.
	pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], Eof> {
		if self.remaining() < len {
			return Err(Eof {
				offset: self.pos,
				needed: len,
				available: self.remaining(),
			});
		}
		let slice = &self.data[self.pos..self.pos + len];
		self.pos += len;
		Ok(slice)
	}

	pub fn array<const N: usize>(&mut self) -> Result<[u8; N], Eof> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.bytes(N)?);
		Ok(out)
	}

	pub fn skip(&mut self, len: usize) -> Result<(), Eof> {
		self.bytes(len).map(|_| ())
	}

	pub fn read_u8(&mut self) -> Result<u8, Eof> {
		Ok(self.array::<1>()?[0])
	}

	pub fn read_u16(&mut self) -> Result<u16, Eof> {
		self.array().map(u16::from_le_bytes)
	}

	pub fn read_i16(&mut self) -> Result<i16, Eof> {
		self.array().map(i16::from_le_bytes)
	}

	pub fn read_u32(&mut self) -> Result<u32, Eof> {
		self.array().map(u32::from_le_bytes)
	}

	pub fn read_i32(&mut self) -> Result<i32, Eof> {
		self.array().map(i32::from_le_bytes)
	}
}
