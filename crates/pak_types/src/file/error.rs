//! Error types for file format parsing.
//!
//! Every format has its own error enum describing what went wrong inside a buffer.
//! [`FileError`] wraps those with the path of the file being processed, so callers
//! driving whole directories can report exactly which asset failed.

use std::{
	fmt,
	io,
	path::{Path, PathBuf},
};

use thiserror::Error;

/// Kind of file an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.PAK` nested archive
	Pak,
	/// `.ZEL` sprite image
	Zel,
	/// `.MAP` level layout
	Map,
	/// Flat RGBA palette table
	Pal,
	/// File targeted by a byte patch
	Patch,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pak => write!(f, "PAK"),
			Self::Zel => write!(f, "ZEL"),
			Self::Map => write!(f, "MAP"),
			Self::Pal => write!(f, "PAL"),
			Self::Patch => write!(f, "patch target"),
		}
	}
}

/// Errors that can occur when parsing a PAK container header
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
	/// Header size field missing or outside `8..=len`
	#[error("Invalid header: header size {header_size:?} out of range for a {len}-byte buffer")]
	InvalidHeader {
		/// Declared header size, `None` if the buffer is too short to hold it
		header_size: Option<u32>,
		/// Length of the buffer
		len: usize,
	},

	/// Last offset does not point at the end of the buffer
	#[error("Size mismatch: last offset {last_offset} does not match buffer length {len}")]
	SizeMismatch {
		/// Value of the last offset in the table
		last_offset: u32,
		/// Length of the buffer
		len: usize,
	},

	/// Offset table is not non-decreasing
	#[error("Invalid offset #{index}: {offset} precedes previous offset {previous}")]
	InvalidOffset {
		/// Index of the offending offset
		index: usize,
		/// Value of the offending offset
		offset: u32,
		/// Value of the offset before it
		previous: u32,
	},
}

/// Rule of the pixel command stream broken by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
	/// Clear-line modifier used while not at a row boundary
	ClearLineMisaligned {
		/// Pixels emitted so far
		total: usize,
		/// Frame width
		width: u16,
	},
	/// Pixel or transparent run longer than one row
	RunExceedsWidth {
		/// Run length
		run: u16,
		/// Frame width
		width: u16,
	},
}

impl fmt::Display for Violation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ClearLineMisaligned {
				total,
				width,
			} => write!(
				f,
				"clear line requested {} pixels into a row of width {}",
				total % usize::from(*width),
				width
			),
			Self::RunExceedsWidth {
				run,
				width,
			} => write!(f, "run of {run} pixels exceeds frame width {width}"),
		}
	}
}

/// Errors that can occur when decoding a single ZEL frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
	/// Frame data ended in the middle of a field
	#[error("Truncated stream: needed {needed} bytes at offset {offset}, {available} available")]
	TruncatedStream {
		/// Offset within the frame where the read started
		offset: usize,
		/// Number of bytes required
		needed: usize,
		/// Number of bytes left
		available: usize,
	},

	/// Zero or oversized frame dimensions
	#[error("Frame too large: {width}x{height} (allowed 1..={max_width} x 1..={max_height})")]
	FrameTooLarge {
		/// Declared width
		width: u16,
		/// Declared height
		height: u16,
		/// Configured maximum width
		max_width: u16,
		/// Configured maximum height
		max_height: u16,
	},

	/// Command stream broke a structural rule
	#[error("Format violation at offset {offset} (command 0x{command:04X}): {violation}")]
	FormatViolation {
		/// Offset of the command within the frame
		offset: usize,
		/// Raw command word
		command: u16,
		/// The rule that was broken
		violation: Violation,
	},

	/// More pixels emitted than the frame holds
	#[error("Pixel overflow: {total} pixels emitted into a {width}x{height} frame")]
	PixelOverflow {
		/// Pixels emitted including the offending run
		total: usize,
		/// Frame width
		width: u16,
		/// Frame height
		height: u16,
	},
}

/// Errors that can occur when decoding a ZEL sprite file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZelError {
	/// The file is not a well-formed frame container
	#[error("Invalid frame container: {0}")]
	Archive(#[from] ArchiveError),

	/// One frame failed to decode; the whole file is rejected
	#[error("Frame {index}/{count}: {source}")]
	Frame {
		/// Index of the failing frame
		index: usize,
		/// Number of frames in the file
		count: usize,
		/// Underlying frame error
		source: FrameError,
	},
}

impl ZelError {
	/// Returns the index of the failing frame, if the error is frame-specific.
	pub fn frame_index(&self) -> Option<usize> {
		match self {
			Self::Frame {
				index,
				..
			} => Some(*index),
			Self::Archive(_) => None,
		}
	}
}

/// Reason a MAP field could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
	/// Buffer exhausted before the field was complete
	UnexpectedEof {
		/// Number of bytes required
		needed: usize,
		/// Number of bytes left
		available: usize,
	},
	/// Bytes left over after the last section
	TrailingBytes {
		/// Number of unconsumed bytes
		remaining: usize,
	},
	/// Tile record placed outside the 128×128 grid
	CoordinateOutOfRange {
		/// Cell X coordinate
		x: u8,
		/// Cell Y coordinate
		y: u8,
	},
}

impl fmt::Display for ParseErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnexpectedEof {
				needed,
				available,
			} => write!(f, "unexpected end of data (needed {needed} bytes, {available} available)"),
			Self::TrailingBytes {
				remaining,
			} => write!(f, "{remaining} unconsumed trailing bytes"),
			Self::CoordinateOutOfRange {
				x,
				y,
			} => write!(f, "cell ({x}, {y}) outside the map grid"),
		}
	}
}

/// Errors that can occur when parsing MAP files
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
	/// File does not start with `MAP\0`
	#[error("Invalid MAP signature: expected {expected:02X?}, got {actual:02X?}")]
	BadSignature {
		/// Expected signature
		expected: [u8; 4],
		/// Signature found in the file
		actual: [u8; 4],
	},

	/// Structural parse failure
	#[error("Parse error in {field} at offset {offset}: {kind}")]
	ParseError {
		/// Name of the field or section being read
		field: &'static str,
		/// Offset where the failure was detected
		offset: usize,
		/// What went wrong
		kind: ParseErrorKind,
	},
}

/// Errors that can occur when loading a palette
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
	/// Palette table is not exactly 256 RGBA entries
	#[error("Invalid palette length: expected {expected} bytes, got {actual} bytes")]
	InvalidLength {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},
}

/// Errors that can occur when applying a byte patch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
	/// File content is neither the expected original nor the patched result
	#[error("Unexpected contents: expected hash {expected} (or patched {patched}), got {actual}")]
	PatchHashMismatch {
		/// Hash of the unpatched file
		expected: String,
		/// Hash of the patched file
		patched: String,
		/// Hash of the file on disk
		actual: String,
	},

	/// Bytes at an edit location differ from what the edit expects
	#[error("Content mismatch at offset 0x{offset:X}: expected [{expected}], found [{actual}]")]
	ContentMismatch {
		/// Offset of the edit
		offset: usize,
		/// Expected bytes, hex encoded
		expected: String,
		/// Bytes found, hex encoded
		actual: String,
	},

	/// Edit lies outside the file or overlaps a previous edit
	#[error("Invalid edit at offset 0x{offset:X} spanning {len} bytes (file is {file_len} bytes)")]
	InvalidEdit {
		/// Offset of the edit
		offset: usize,
		/// Number of bytes the edit replaces
		len: usize,
		/// Length of the unpatched file
		file_len: usize,
	},

	/// Edits applied cleanly but the result has an unexpected hash
	#[error("Patched content hash {actual} does not match expected {expected}")]
	ResultHashMismatch {
		/// Expected hash after patching
		expected: String,
		/// Hash of the produced content
		actual: String,
	},
}

/// Unified error type annotating format errors with the originating file
#[derive(Debug, Error)]
pub enum FileError {
	/// Reading or writing the file failed
	#[error("I/O error on {}: {source}", .path.display())]
	Io {
		/// Path of the file
		path: PathBuf,
		/// Underlying I/O error
		source: io::Error,
	},

	/// Container header rejected
	#[error("{file_type} file {}: {source}", .path.display())]
	Archive {
		/// Kind of file the container belongs to
		file_type: FileType,
		/// Path of the file
		path: PathBuf,
		/// Underlying archive error
		source: ArchiveError,
	},

	/// Sprite decoding failed
	#[error("ZEL file {}: {source}", .path.display())]
	Zel {
		/// Path of the file
		path: PathBuf,
		/// Underlying sprite error
		source: ZelError,
	},

	/// Level parsing failed
	#[error("MAP file {}: {source}", .path.display())]
	Map {
		/// Path of the file
		path: PathBuf,
		/// Underlying level error
		source: MapError,
	},

	/// Palette loading failed
	#[error("PAL file {}: {source}", .path.display())]
	Palette {
		/// Path of the file
		path: PathBuf,
		/// Underlying palette error
		source: PaletteError,
	},

	/// Byte patch refused
	#[error("Patch of {}: {source}", .path.display())]
	Patch {
		/// Path of the file
		path: PathBuf,
		/// Underlying patch error
		source: PatchError,
	},
}

impl FileError {
	/// Creates an I/O error for the given path.
	pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	/// Returns the kind of file the error originated from, if known.
	pub fn file_type(&self) -> Option<FileType> {
		match self {
			Self::Io {
				..
			} => None,
			Self::Archive {
				file_type,
				..
			} => Some(*file_type),
			Self::Zel {
				..
			} => Some(FileType::Zel),
			Self::Map {
				..
			} => Some(FileType::Map),
			Self::Palette {
				..
			} => Some(FileType::Pal),
			Self::Patch {
				..
			} => Some(FileType::Patch),
		}
	}

	/// Returns the path of the file the error originated from.
	pub fn path(&self) -> &Path {
		match self {
			Self::Io {
				path,
				..
			}
			| Self::Archive {
				path,
				..
			}
			| Self::Zel {
				path,
				..
			}
			| Self::Map {
				path,
				..
			}
			| Self::Palette {
				path,
				..
			}
			| Self::Patch {
				path,
				..
			} => path,
		}
	}
}
