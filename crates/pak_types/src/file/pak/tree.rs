//! Recursive extraction of nested containers.
//!
//! Every blob classified as [`BlobKind::Archive`] is parsed again, producing a tree
//! whose leaves are sounds and generic blobs. Children are strict sub-ranges of
//! their parent, so extraction always terminates. Extraction, statistics and
//! dropping all use explicit stacks rather than recursion, so arbitrarily deep
//! chains of containers are handled.
//!
//! Nodes are named the way the game dumps have always been laid out: a nested
//! container at position `i` is written as `archive_NNNN.bin` and its children go
//! into the sibling directory `archive_NNNN/`, leaves are `file_NNNN.bin` (or
//! `.wav` for sound data).

use std::path::{Path, PathBuf};

use log::trace;

use super::{Archive, BlobKind};
use crate::file::ArchiveError;

/// One extracted blob and, for containers, its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
	index: usize,
	data: &'a [u8],
	kind: BlobKind,
	children: Vec<Node<'a>>,
}

impl<'a> Node<'a> {
	/// Returns the position of the node within its parent.
	#[inline]
	pub fn index(&self) -> usize {
		self.index
	}

	/// Returns the raw bytes of the node.
	#[inline]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	/// Returns the classification of the node.
	#[inline]
	pub fn kind(&self) -> BlobKind {
		self.kind
	}

	/// Returns the extracted children (empty for leaves).
	#[inline]
	pub fn children(&self) -> &[Node<'a>] {
		&self.children
	}

	/// Returns true if the node is a nested container.
	#[inline]
	pub fn is_archive(&self) -> bool {
		self.kind == BlobKind::Archive
	}

	/// Returns the name the node is written under, e.g. `archive_0003.bin`.
	pub fn file_name(&self) -> String {
		format!("{}.{}", self.stem(), self.kind.extension())
	}

	/// Returns the file name without extension, which is also the directory holding
	/// the children of a container.
	pub fn stem(&self) -> String {
		format!("{}_{:04}", self.kind.prefix(), self.index)
	}
}

impl Drop for Node<'_> {
	fn drop(&mut self) {
		// flatten so deeply nested chains are not dropped recursively
		let mut pending = std::mem::take(&mut self.children);
		while let Some(mut node) = pending.pop() {
			pending.append(&mut node.children);
		}
	}
}

/// Container whose blobs are still being extracted.
struct Pending<'a> {
	index: usize,
	data: &'a [u8],
	blobs: std::vec::IntoIter<(usize, &'a [u8], BlobKind)>,
	children: Vec<Node<'a>>,
}

impl<'a> Pending<'a> {
	fn open(index: usize, data: &'a [u8]) -> Result<Self, ArchiveError> {
		let archive = Archive::parse(data)?;
		let blobs: Vec<_> = archive.blobs().map(|blob| (blob.index(), blob.data(), blob.kind())).collect();
		Ok(Self {
			index,
			data,
			children: Vec::with_capacity(blobs.len()),
			blobs: blobs.into_iter(),
		})
	}

	fn finish(self) -> Node<'a> {
		Node {
			index: self.index,
			data: self.data,
			kind: BlobKind::Archive,
			children: self.children,
		}
	}
}

/// Extracts the blobs of `data` depth-first, keeping unfinished containers on a stack.
fn extract_children(data: &[u8]) -> Result<Vec<Node<'_>>, ArchiveError> {
	let mut root = Pending::open(0, data)?;
	let mut stack: Vec<Pending<'_>> = Vec::new();

	loop {
		let top = stack.last_mut().unwrap_or(&mut root);
		match top.blobs.next() {
			Some((index, data, BlobKind::Archive)) => stack.push(Pending::open(index, data)?),
			Some((index, data, kind)) => top.children.push(Node {
				index,
				data,
				kind,
				children: Vec::new(),
			}),
			None => match stack.pop() {
				Some(done) => {
					trace!("extracted container #{} with {} blobs", done.index, done.children.len());
					stack.last_mut().unwrap_or(&mut root).children.push(done.finish());
				}
				None => return Ok(root.children),
			},
		}
	}
}

/// Fully extracted container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<'a> {
	data: &'a [u8],
	children: Vec<Node<'a>>,
}

impl<'a> Tree<'a> {
	/// Extracts `data` and every nested container inside it.
	pub fn extract(data: &'a [u8]) -> Result<Self, ArchiveError> {
		let children = extract_children(data)?;
		Ok(Self {
			data,
			children,
		})
	}

	/// Returns the root buffer.
	#[inline]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	/// Returns the top-level blobs.
	#[inline]
	pub fn children(&self) -> &[Node<'a>] {
		&self.children
	}

	/// Walks the tree depth-first in pre-order.
	///
	/// Paths are relative to the directory the root container is extracted into.
	pub fn walk(&self) -> Walk<'_, 'a> {
		Walk {
			stack: self.children.iter().rev().map(|node| (PathBuf::new(), node)).collect(),
		}
	}

	/// Counts nodes by kind across the whole tree.
	pub fn stats(&self) -> TreeStats {
		let mut stats = TreeStats::default();
		let mut stack: Vec<(&Node<'a>, usize)> = self.children.iter().map(|node| (node, 1)).collect();
		while let Some((node, level)) = stack.pop() {
			match node.kind() {
				BlobKind::Archive => stats.archives += 1,
				BlobKind::Sound => stats.sounds += 1,
				BlobKind::Generic => stats.files += 1,
			}
			stats.depth = stats.depth.max(level);
			stack.extend(node.children().iter().map(|child| (child, level + 1)));
		}
		stats
	}
}

/// Node counts of a [`Tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
	/// Nested containers
	pub archives: usize,
	/// Sound leaves
	pub sounds: usize,
	/// Generic leaves
	pub files: usize,
	/// Longest chain of nodes from the root to a leaf
	pub depth: usize,
}

/// Depth-first iterator returned by [`Tree::walk`].
#[derive(Debug)]
pub struct Walk<'t, 'a> {
	stack: Vec<(PathBuf, &'t Node<'a>)>,
}

impl<'t, 'a> Iterator for Walk<'t, 'a> {
	type Item = (PathBuf, &'t Node<'a>);

	fn next(&mut self) -> Option<Self::Item> {
		let (dir, node) = self.stack.pop()?;
		if node.is_archive() {
			let child_dir = dir.join(node.stem());
			for child in node.children().iter().rev() {
				self.stack.push((child_dir.clone(), child));
			}
		}
		let path = dir.join(node.file_name());
		trace!("walk: {}", path.display());
		Some((path, node))
	}
}

/// Decides whether an intermediate container file may be removed once its children
/// have been written.
///
/// Only containers are ever discarded, and only when `renamed` recognises the
/// path they were written under. Leaves are always kept.
pub fn discardable<F>(path: &Path, node: &Node<'_>, renamed: F) -> bool
where
	F: Fn(&Path) -> bool,
{
	node.is_archive() && renamed(path)
}
