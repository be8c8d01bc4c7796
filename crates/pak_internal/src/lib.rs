//! This module is separated into its own crate to keep the format code apart from the
//! `pak-rs` facade, and should not be used directly.

/// `use pak_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export pak_types for convenience
pub use pak_types;

// Re-export commonly used types at crate root
pub use pak_types::file::{FileError, FileType, MapFile, Palette, Tree, ZelFile};
