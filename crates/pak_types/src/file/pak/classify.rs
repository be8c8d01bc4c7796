//! Blob classification by leading bytes.

use std::fmt;

use super::is_archive;

/// Signature of RIFF (WAVE) sound data
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";

/// Kind of data held by a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
	/// Nested container
	Archive,
	/// RIFF sound data
	Sound,
	/// Anything else
	Generic,
}

impl BlobKind {
	/// Returns the file extension used when the blob is written out.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Sound => "wav",
			Self::Archive | Self::Generic => "bin",
		}
	}

	/// Returns the stem prefix used by the dump naming scheme.
	pub fn prefix(&self) -> &'static str {
		match self {
			Self::Archive => "archive",
			Self::Sound | Self::Generic => "file",
		}
	}
}

impl fmt::Display for BlobKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Archive => write!(f, "archive"),
			Self::Sound => write!(f, "sound"),
			Self::Generic => write!(f, "generic"),
		}
	}
}

/// Classifies a blob.
///
/// A well-formed container always wins, even if its first bytes happen to spell
/// `RIFF`.
pub fn classify(data: &[u8]) -> BlobKind {
	if is_archive(data) {
		BlobKind::Archive
	} else if data.starts_with(RIFF_MAGIC) {
		BlobKind::Sound
	} else {
		BlobKind::Generic
	}
}
