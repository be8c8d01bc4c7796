//! File format tests for `pak-rs`

mod archive;
mod map;
mod zel;

/// Wraps blobs in a PAK container.
pub(crate) fn container(blobs: &[&[u8]]) -> Vec<u8> {
	let mut offsets = vec![((blobs.len() + 1) * 4) as u32];
	for blob in blobs {
		offsets.push(offsets[offsets.len() - 1] + blob.len() as u32);
	}
	let mut data: Vec<u8> = offsets.iter().flat_map(|o| o.to_le_bytes()).collect();
	for blob in blobs {
		data.extend_from_slice(blob);
	}
	data
}
