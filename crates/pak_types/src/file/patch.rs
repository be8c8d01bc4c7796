//! Content-hash gated byte patches.
//!
//! A few sprite files shipped with the game contain frames whose command streams
//! are off by two bytes, which skews every following command. A [`Patch`] repairs
//! such a file by replacing byte ranges, but only when the file hashes to the
//! exact revision the patch was written for. A file that already hashes to the
//! patched revision is left alone.
//!
//! Edit offsets always refer to the unpatched file and must be in ascending,
//! non-overlapping order.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::file::{FileError, PatchError};

/// Returns the lowercase hex SHA-1 digest of `data`.
pub fn sha1_hex(data: &[u8]) -> String {
	hex::encode(Sha1::digest(data))
}

/// Replacement of one byte range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
	/// Offset in the unpatched file
	pub offset: usize,
	/// Bytes expected at `offset` (may be empty for a pure insertion)
	#[serde(with = "hex")]
	pub before: Vec<u8>,
	/// Bytes written in their place (may be empty for a pure deletion)
	#[serde(with = "hex")]
	pub after: Vec<u8>,
}

impl Edit {
	/// Creates an edit.
	pub fn new(offset: usize, before: &[u8], after: &[u8]) -> Self {
		Self {
			offset,
			before: before.to_vec(),
			after: after.to_vec(),
		}
	}
}

/// Result of applying a patch to a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
	/// The edits were applied; holds the patched contents
	Applied(Vec<u8>),
	/// The contents already match the patched revision
	AlreadyPatched,
}

/// Patch for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
	/// Path of the target relative to the game data root
	pub path: PathBuf,
	/// What the patch repairs
	#[serde(default)]
	pub description: String,
	/// SHA-1 of the unpatched file, lowercase hex
	pub hash_before: String,
	/// SHA-1 of the patched file, lowercase hex
	pub hash_after: String,
	/// Edits in ascending offset order
	pub edits: Vec<Edit>,
}

impl Patch {
	/// Applies the patch to `data`.
	///
	/// # Errors
	///
	/// - [`PatchError::PatchHashMismatch`] if `data` is neither the unpatched nor the
	///   patched revision
	/// - [`PatchError::InvalidEdit`] if an edit overlaps the previous one or runs past
	///   the end of the data
	/// - [`PatchError::ContentMismatch`] if the bytes at an edit differ from `before`
	/// - [`PatchError::ResultHashMismatch`] if the result does not hash to `hash_after`
	pub fn apply(&self, data: &[u8]) -> Result<PatchOutcome, PatchError> {
		let actual = sha1_hex(data);
		if actual.eq_ignore_ascii_case(&self.hash_after) {
			return Ok(PatchOutcome::AlreadyPatched);
		}
		if !actual.eq_ignore_ascii_case(&self.hash_before) {
			return Err(PatchError::PatchHashMismatch {
				expected: self.hash_before.clone(),
				patched: self.hash_after.clone(),
				actual,
			});
		}

		let mut out = Vec::with_capacity(data.len());
		let mut cursor = 0;
		for edit in &self.edits {
			let end = edit.offset.checked_add(edit.before.len()).filter(|&end| end <= data.len());
			let end = match end {
				Some(end) if edit.offset >= cursor => end,
				_ => {
					return Err(PatchError::InvalidEdit {
						offset: edit.offset,
						len: edit.before.len(),
						file_len: data.len(),
					});
				}
			};

			let found = &data[edit.offset..end];
			if found != edit.before.as_slice() {
				return Err(PatchError::ContentMismatch {
					offset: edit.offset,
					expected: hex::encode(&edit.before),
					actual: hex::encode(found),
				});
			}

			debug!(
				"patch: 0x{:X}: [{}] -> [{}]",
				edit.offset,
				hex::encode(&edit.before),
				hex::encode(&edit.after)
			);
			out.extend_from_slice(&data[cursor..edit.offset]);
			out.extend_from_slice(&edit.after);
			cursor = end;
		}
		out.extend_from_slice(&data[cursor..]);

		let result = sha1_hex(&out);
		if !result.eq_ignore_ascii_case(&self.hash_after) {
			return Err(PatchError::ResultHashMismatch {
				expected: self.hash_after.clone(),
				actual: result,
			});
		}

		Ok(PatchOutcome::Applied(out))
	}

	/// Patches the target below `root` in place.
	pub fn apply_file<P: AsRef<Path>>(&self, root: P) -> Result<PatchOutcome, FileError> {
		let path = root.as_ref().join(&self.path);
		let data = std::fs::read(&path).map_err(|e| FileError::io(&path, e))?;

		let outcome = self.apply(&data).map_err(|source| FileError::Patch {
			path: path.clone(),
			source,
		})?;

		match &outcome {
			PatchOutcome::Applied(patched) => {
				std::fs::write(&path, patched).map_err(|e| FileError::io(&path, e))?;
				info!("patched {}", path.display());
			}
			PatchOutcome::AlreadyPatched => info!("{} already patched", path.display()),
		}
		Ok(outcome)
	}
}

/// Returns the repairs for the damaged building tilesets of the original release.
pub fn known_patches() -> Vec<Patch> {
	vec![
		Patch {
			path: PathBuf::from("X/tilesets/tileset_4_buildings.zel"),
			description: "frame 221: realign three pixel lines and restore two commands".to_string(),
			hash_before: "776a9f27489da08bcd85b654eaf0474f90994449".to_string(),
			hash_after: "6c74668a0d168c49b3f33b08b1c93dd8ab072fe7".to_string(),
			edits: vec![
				Edit::new(0x32D817, &[0x1B, 0x1B], &[]),
				Edit::new(0x32DB71, &[], &[0x1B, 0x1B]),
				Edit::new(0x32E73C, &[0x1C, 0x0E], &[]),
				// transparent run of 46, matching the width of the previous line
				Edit::new(0x32EB78, &[], &[0x2E, 0x00]),
				Edit::new(0x32F847, &[0x3E, 0x3E], &[]),
				// clear-line transparent run of 25, matching the next line
				Edit::new(0x32FB97, &[], &[0x19, 0x80]),
			],
		},
		Patch {
			path: PathBuf::from("X/tilesets/tileset_8_buildings.zel"),
			description: "frames 327 and 328: realign pixel lines".to_string(),
			hash_before: "5b34a4b0f4722b50e461aeba963e37ac85460112".to_string(),
			hash_after: "485d44e59ce719269c52c910d7bd06b824c4b82c".to_string(),
			edits: vec![
				Edit::new(0x30377A, &[0xF9, 0x2D], &[]),
				Edit::new(0x303AEF, &[], &[0xF9, 0x2D]),
				Edit::new(0x3047AC, &[0x2F, 0x99], &[]),
				Edit::new(0x304B06, &[], &[0x2F, 0x99]),
			],
		},
		Patch {
			path: PathBuf::from("X/tilesets/tileset_14_buildings.zel"),
			description: "realign one pixel line".to_string(),
			hash_before: "4206e376b52c60990ddfb80c64d0adc5f7d34b66".to_string(),
			hash_after: "4a9a5ca262f98cbef167dd1d053caf4c8007cca0".to_string(),
			edits: vec![Edit::new(0x1579C8, &[0x0B, 0x0B], &[]), Edit::new(0x157B54, &[], &[0x0B, 0x0B])],
		},
	]
}
