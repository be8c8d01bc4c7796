//! Benchmark helper utilities for pak-rs
//!
//! This module generates synthetic ZEL sprites and nested PAK archives so the
//! benchmarks run without any game data.

/// Wraps blobs in a PAK container.
pub fn build_container(blobs: &[Vec<u8>]) -> Vec<u8> {
	let header_size = (blobs.len() + 1) * 4;
	let mut data = Vec::with_capacity(header_size + blobs.iter().map(Vec::len).sum::<usize>());

	let mut offset = header_size as u32;
	data.extend_from_slice(&offset.to_le_bytes());
	for blob in blobs {
		offset += blob.len() as u32;
		data.extend_from_slice(&offset.to_le_bytes());
	}
	for blob in blobs {
		data.extend_from_slice(blob);
	}
	data
}

/// Generates one ZEL frame exercising every command kind.
///
/// Every eighth row is skipped with a transparent-lines command; the other rows
/// are a transparent run over the first quarter, a pixel run over the middle half
/// and a clear-line transparent run for the rest.
pub fn generate_zel_frame(width: u16, height: u16) -> Vec<u8> {
	let mut data = Vec::new();
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());

	let lead = width / 4;
	let run = width / 2;
	let tail = width - lead - run;

	for y in 0..height {
		if y % 8 == 7 {
			data.extend_from_slice(&(0x4000u16 | 1).to_le_bytes());
			continue;
		}
		// a zero-length transparent run would read as the terminator
		if lead > 0 {
			data.extend_from_slice(&lead.to_le_bytes());
		}
		data.extend_from_slice(&(0x1000u16 | run).to_le_bytes());
		data.extend((0..run).map(|x| (x as u8).wrapping_add(y as u8)));
		data.extend_from_slice(&(0x8000u16 | tail).to_le_bytes());
	}
	data.extend_from_slice(&0u16.to_le_bytes());
	data
}

/// Generates a ZEL file of `frames` identical frames.
pub fn generate_zel_file(frames: usize, width: u16, height: u16) -> Vec<u8> {
	let frame = generate_zel_frame(width, height);
	build_container(&vec![frame; frames])
}

/// Generates a PAK archive nested `depth` levels deep with `fanout` blobs per level.
///
/// The last blob of each level is the next nested archive, the others are generic
/// leaves of `leaf_size` bytes.
pub fn generate_pak_tree(depth: usize, fanout: usize, leaf_size: usize) -> Vec<u8> {
	let leaf = vec![0xA5u8; leaf_size];
	let mut current = build_container(&vec![leaf.clone(); fanout]);
	for _ in 1..depth {
		let mut blobs = vec![leaf.clone(); fanout.saturating_sub(1)];
		blobs.push(current);
		current = build_container(&blobs);
	}
	current
}

/// Common benchmark sizes for synthetic frames
pub mod sizes {
	/// Floor tile: 64x32
	pub const TILE: (u16, u16) = (64, 32);
	/// Building sprite: 256x256
	pub const BUILDING: (u16, u16) = (256, 256);
	/// Full screen: 640x480
	pub const SCREEN: (u16, u16) = (640, 480);
	/// Largest accepted frame: 1280x1280
	pub const MAX: (u16, u16) = (1280, 1280);
}

#[cfg(test)]
mod tests {
	use super::*;
	use pak_types::file::pak::{Archive, Tree};
	use pak_types::file::{DecodeOptions, Palette, zel};

	#[test]
	fn test_generated_frame_decodes() {
		let (width, height) = sizes::TILE;
		let frame = zel::decode_frame(&generate_zel_frame(width, height), &Palette::plan9(), &DecodeOptions::default())
			.unwrap();
		assert_eq!((frame.width(), frame.height()), sizes::TILE);
		// 28 of 32 rows carry a pixel run of half the width
		assert_eq!(frame.opaque_count(), 28 * 32);
	}

	#[test]
	fn test_generated_narrow_frame_decodes() {
		// width 3 has no leading transparent run: one pixel and a clear-line tail per row
		let frame = zel::decode_frame(&generate_zel_frame(3, 2), &Palette::plan9(), &DecodeOptions::default()).unwrap();
		assert_eq!((frame.width(), frame.height()), (3, 2));
		assert_eq!(frame.opaque_count(), 2);
		assert!(frame.get(0, 1).is_some_and(|c| !c.is_transparent()));
	}

	#[test]
	fn test_generated_zel_file() {
		let data = generate_zel_file(3, 16, 16);
		assert_eq!(Archive::parse(&data).unwrap().len(), 3);
	}

	#[test]
	fn test_generated_tree_depth() {
		let data = generate_pak_tree(4, 3, 16);
		let stats = Tree::extract(&data).unwrap().stats();
		assert_eq!(stats.depth, 4);
		assert_eq!(stats.archives, 3);
		assert_eq!(stats.files, 3 * 4 - 3);
	}
}
