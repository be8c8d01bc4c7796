//! `.PAK` archive container support.
//!
//! PAK archives are the game's only container format. Sprite files (`.ZEL`) reuse
//! the very same layout for their frame tables, and archives freely nest other
//! archives.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size              Field
//! ------  ----------------  ------------------------------------------
//! 0x00    4                 header_size (u32, also offsets[0])
//! 0x04    header_size - 4   remaining offsets (u32 each)
//! ...     ...               blob data
//! ```
//!
//! The header is the offset table itself: `header_size / 4` little-endian u32
//! values, where blob `i` spans `[offsets[i], offsets[i + 1])`. The first offset
//! is the header size (blob data starts right after the table) and the last offset
//! is the total file length. An archive holding a single empty blob therefore has
//! the 8-byte header `08 00 00 00  08 00 00 00`.
//!
//! # Examples
//!
//! ```no_run
//! use pak_types::file::pak::{Archive, BlobKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("X.PAK")?;
//! let archive = Archive::parse(&data)?;
//!
//! for blob in archive.blobs() {
//!     println!("#{} {} bytes, {}", blob.index(), blob.len(), blob.kind());
//! }
//! # Ok(())
//! # }
//! ```

use std::cell::OnceCell;
use std::ops::Range;

use log::debug;

use crate::file::ArchiveError;
use crate::file::reader::ByteReader;

pub mod classify;
pub mod tree;

pub use classify::{BlobKind, classify};
pub use tree::{Node, Tree, TreeStats, Walk, discardable};

/// PAK container constants.
pub mod constants {
	/// Size of a single offset entry
	pub const OFFSET_SIZE: usize = 4;

	/// Smallest valid header: the start and end offset of one blob
	pub const MIN_HEADER_SIZE: usize = 2 * OFFSET_SIZE;
}

/// Parsed offset table of a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
	offsets: Vec<u32>,
}

impl Header {
	/// Parses and validates the offset table at the start of `data`.
	///
	/// # Errors
	///
	/// - [`ArchiveError::InvalidHeader`] if the buffer is shorter than 4 bytes or the
	///   declared header size is below 8 or beyond the buffer
	/// - [`ArchiveError::SizeMismatch`] if the last offset is not the buffer length
	/// - [`ArchiveError::InvalidOffset`] if the table is not non-decreasing
	pub fn parse(data: &[u8]) -> Result<Self, ArchiveError> {
		let mut reader = ByteReader::new(data);
		let header_size = reader.read_u32().map_err(|_| ArchiveError::InvalidHeader {
			header_size: None,
			len: data.len(),
		})?;

		let size = header_size as usize;
		if size < constants::MIN_HEADER_SIZE || size > data.len() {
			return Err(ArchiveError::InvalidHeader {
				header_size: Some(header_size),
				len: data.len(),
			});
		}

		let offsets: Vec<u32> = data[..size]
			.chunks_exact(constants::OFFSET_SIZE)
			.map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
			.collect();

		// `size >= 8` guarantees at least two offsets, and offsets[0] is the size field itself
		let last_offset = offsets[offsets.len() - 1];
		if last_offset as usize != data.len() {
			return Err(ArchiveError::SizeMismatch {
				last_offset,
				len: data.len(),
			});
		}

		for (index, pair) in offsets.windows(2).enumerate() {
			if pair[1] < pair[0] {
				return Err(ArchiveError::InvalidOffset {
					index: index + 1,
					offset: pair[1],
					previous: pair[0],
				});
			}
		}

		Ok(Self {
			offsets,
		})
	}

	/// Returns the raw offset table.
	#[inline]
	pub fn offsets(&self) -> &[u32] {
		&self.offsets
	}

	/// Returns the size of the header in bytes.
	#[inline]
	pub fn size(&self) -> usize {
		self.offsets[0] as usize
	}

	/// Returns the number of blobs described by the table.
	#[inline]
	pub fn blob_count(&self) -> usize {
		self.offsets.len() - 1
	}

	/// Returns the byte range of blob `index`.
	pub fn range(&self, index: usize) -> Option<Range<usize>> {
		let start = *self.offsets.get(index)? as usize;
		let end = *self.offsets.get(index + 1)? as usize;
		Some(start..end)
	}
}

/// Reports whether `data` is a well-formed container.
pub fn is_archive(data: &[u8]) -> bool {
	Header::parse(data).is_ok()
}

/// One byte range of a container, borrowed from the parent buffer.
#[derive(Debug, Clone)]
pub struct Blob<'a> {
	index: usize,
	range: Range<usize>,
	data: &'a [u8],
	kind: OnceCell<BlobKind>,
}

impl<'a> Blob<'a> {
	/// Returns the position of the blob within its container.
	#[inline]
	pub fn index(&self) -> usize {
		self.index
	}

	/// Returns the byte range of the blob within its parent buffer.
	#[inline]
	pub fn range(&self) -> Range<usize> {
		self.range.clone()
	}

	/// Returns the blob contents.
	#[inline]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	/// Returns the blob length in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns true if the blob is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Classifies the blob on first use and caches the result.
	pub fn kind(&self) -> BlobKind {
		*self.kind.get_or_init(|| classify(self.data))
	}
}

/// A parsed container borrowing its buffer.
#[derive(Debug, Clone)]
pub struct Archive<'a> {
	data: &'a [u8],
	header: Header,
}

impl<'a> Archive<'a> {
	/// Parses the container header of `data`.
	pub fn parse(data: &'a [u8]) -> Result<Self, ArchiveError> {
		let header = Header::parse(data)?;
		debug!("archive: {} bytes, {} blobs", data.len(), header.blob_count());
		Ok(Self {
			data,
			header,
		})
	}

	/// Returns the parsed header.
	#[inline]
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Returns the whole underlying buffer.
	#[inline]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	/// Returns the number of blobs.
	#[inline]
	pub fn len(&self) -> usize {
		self.header.blob_count()
	}

	/// Returns true if the container holds no blob data at all.
	///
	/// A container always describes at least one blob, but every blob may be empty.
	pub fn is_empty(&self) -> bool {
		self.header.size() == self.data.len()
	}

	/// Returns blob `index`, or `None` if out of range.
	pub fn blob(&self, index: usize) -> Option<Blob<'a>> {
		let range = self.header.range(index)?;
		Some(Blob {
			index,
			data: &self.data[range.clone()],
			range,
			kind: OnceCell::new(),
		})
	}

	/// Returns an iterator over all blobs in order.
	pub fn blobs(&self) -> Blobs<'_, 'a> {
		Blobs {
			archive: self,
			current_index: 0,
		}
	}
}

/// Iterator over the blobs of an [`Archive`].
#[derive(Debug, Clone)]
pub struct Blobs<'s, 'a> {
	archive: &'s Archive<'a>,
	current_index: usize,
}

impl<'s, 'a> Iterator for Blobs<'s, 'a> {
	type Item = Blob<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		let blob = self.archive.blob(self.current_index)?;
		self.current_index += 1;
		Some(blob)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.archive.len() - self.current_index;
		(remaining, Some(remaining))
	}
}

impl<'s, 'a> ExactSizeIterator for Blobs<'s, 'a> {}

impl<'s, 'a> IntoIterator for &'s Archive<'a> {
	type Item = Blob<'a>;
	type IntoIter = Blobs<'s, 'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.blobs()
	}
}

/// Builds a container around the given blobs. Test helper.
#[cfg(test)]
pub(crate) fn build(blobs: &[&[u8]]) -> Vec<u8> {
	let header_size = (blobs.len() + 1) * constants::OFFSET_SIZE;
	let mut out = Vec::new();
	let mut offset = header_size;
	out.extend_from_slice(&(offset as u32).to_le_bytes());
	for blob in blobs {
		offset += blob.len();
		out.extend_from_slice(&(offset as u32).to_le_bytes());
	}
	for blob in blobs {
		out.extend_from_slice(blob);
	}
	out
}
