//! Prelude module for `pak_types`.
//!
//! This module provides a convenient way to import commonly used types and functions.
//!
//! # Examples
//!
//! ```no_run
//! use pak_types::prelude::*;
//!
//! let palette = Palette::plan9();
//! let options = DecodeOptions::default().with_constant_pixels(true);
//! ```

// Error types
#[doc(inline)]
pub use crate::file::{ArchiveError, FileError, FileType, FrameError, MapError, PaletteError, PatchError, ZelError};

// PAK types
#[doc(inline)]
pub use crate::file::{Archive, Blob, BlobKind, Tree};

// ZEL types
#[doc(inline)]
pub use crate::file::{Color, DecodeOptions, Frame, Palette, ZelFile};

// MAP types
#[doc(inline)]
pub use crate::file::{FloorFrame, MapFile, Overlay, Tile, TileLayer};

// Patch types
#[doc(inline)]
pub use crate::file::{Edit, Patch, PatchOutcome, known_patches};
