//! File format support for the `pak-rs` project.

mod error;
mod reader;

pub mod map;
pub mod pak;
pub mod palette;
pub mod patch;
pub mod zel;

// Re-export error types
pub use error::{
	ArchiveError, FileError, FileType, FrameError, MapError, PaletteError, ParseErrorKind, PatchError,
	Violation, ZelError,
};

// Re-export main file types
pub use map::{File as MapFile, FloorFrame, Overlay, Tile, TileLayer};
pub use pak::{Archive, Blob, BlobKind, Tree};
pub use palette::{Color, Palette};
pub use patch::{Edit, Patch, PatchOutcome, known_patches};
pub use zel::{DecodeOptions, File as ZelFile, Frame};
