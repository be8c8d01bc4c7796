//! This crate provides the decoders for the asset formats of the `pak-rs` project.
//!
//! # File Formats
//!
//! - **PAK**: Offset-table containers, nested arbitrarily deep
//! - **ZEL**: Multi-frame paletted sprites stored as PAK containers of run-encoded frames
//! - **MAP**: Level layouts with collision and floor grids plus tile and overlay lists
//! - **Palette**: Flat 256-entry RGBA tables, with a built-in Plan 9 fallback
//!
//! Known-damaged sprite files can be repaired with the hash-gated patches in
//! [`file::patch`].
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use pak_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("X.PAK")?;
//! let tree = Tree::extract(&data)?;
//! for (path, node) in tree.walk() {
//!     println!("{} ({})", path.display(), node.kind());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use pak_types::file::{Palette, zel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sprite = zel::File::open("X/base_floors_tileset.zel", &Palette::plan9(), &zel::DecodeOptions::default())?;
//! println!("{} frames", sprite.len());
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use pak_types::prelude::*;` to import commonly used items.
pub mod prelude;
