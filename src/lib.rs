#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `pak-rs` decodes the asset formats of a legacy isometric game: nested PAK
//! archives, ZEL sprites and MAP level files.
//!
pub use pak_internal::*;
