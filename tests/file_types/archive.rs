//! PAK extraction

use pak_rs::pak_types::file::ArchiveError;
use pak_rs::pak_types::file::pak::{Archive, BlobKind, Header, Tree, classify, discardable, is_archive};

use crate::container;

#[test_log::test]
fn test_blobs_reconstruct_buffer() {
	let data = container(&[b"first", b"", b"third blob", b"RIFF\x04\x00\x00\x00WAVE"]);
	let archive = Archive::parse(&data).unwrap();
	let offsets = archive.header().offsets();

	let mut rebuilt = data[..archive.header().size()].to_vec();
	for blob in &archive {
		let range = blob.range();
		assert_eq!(range.start, offsets[blob.index()] as usize);
		assert_eq!(range.end, offsets[blob.index() + 1] as usize);
		rebuilt.extend_from_slice(blob.data());
	}
	assert_eq!(rebuilt, data);
}

#[test]
fn test_truncation_is_size_mismatch() {
	let data = container(&[b"abc", b"def"]);
	for cut in 1..4 {
		let truncated = &data[..data.len() - cut];
		assert!(matches!(Header::parse(truncated), Err(ArchiveError::SizeMismatch { .. })));
		assert!(!is_archive(truncated));
	}
}

#[test]
fn test_header_size_four_is_invalid() {
	let mut data = container(&[b"abcd"]);
	data[0] = 4;
	assert!(matches!(
		Header::parse(&data),
		Err(ArchiveError::InvalidHeader {
			header_size: Some(4),
			..
		})
	));
}

#[test]
fn test_classification() {
	let inner = container(&[b"x"]);
	assert_eq!(classify(&inner), BlobKind::Archive);
	assert_eq!(classify(b"RIFF\x00\x00\x00\x00WAVEfmt "), BlobKind::Sound);
	assert_eq!(classify(b"\x00\x01\x02"), BlobKind::Generic);
}

#[test_log::test]
fn test_nested_tree_walk() {
	let sound: &[u8] = b"RIFF\x04\x00\x00\x00WAVE";
	let level2 = container(&[sound, b"deepest"]);
	let level1 = container(&[&level2]);
	let root = container(&[b"readme", &level1, b"tail"]);

	let tree = Tree::extract(&root).unwrap();
	let walked: Vec<(String, BlobKind)> = tree
		.walk()
		.map(|(path, node)| (path.to_string_lossy().replace('\\', "/"), node.kind()))
		.collect();

	assert_eq!(
		walked,
		vec![
			("file_0000.bin".to_string(), BlobKind::Generic),
			("archive_0001.bin".to_string(), BlobKind::Archive),
			("archive_0001/archive_0000.bin".to_string(), BlobKind::Archive),
			("archive_0001/archive_0000/file_0000.wav".to_string(), BlobKind::Sound),
			("archive_0001/archive_0000/file_0001.bin".to_string(), BlobKind::Generic),
			("file_0002.bin".to_string(), BlobKind::Generic),
		]
	);

	let stats = tree.stats();
	assert_eq!((stats.archives, stats.sounds, stats.files, stats.depth), (2, 1, 3, 3));
}

#[test]
fn test_discard_only_renamed_containers() {
	let level1 = container(&[b"leaf"]);
	let root = container(&[&level1, b"keep"]);
	let tree = Tree::extract(&root).unwrap();

	let renamed = |_: &std::path::Path| true;
	let discarded: Vec<_> = tree.walk().filter(|(path, node)| discardable(path, node, renamed)).collect();
	assert_eq!(discarded.len(), 1);
	assert!(discarded[0].1.is_archive());

	let never = |_: &std::path::Path| false;
	assert_eq!(tree.walk().filter(|(path, node)| discardable(path, node, never)).count(), 0);
}
