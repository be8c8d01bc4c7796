//! Prelude module for `pak_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use pak_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let palette = Palette::plan9();
//! let options = DecodeOptions::default().with_max_size(640, 480);
//! assert_eq!(palette.get(255), Color::rgb(255, 255, 255));
//! assert_eq!(options.max_height, 480);
//! ```

// Re-export everything from pak_types::prelude
#[doc(inline)]
pub use pak_types::prelude::*;

// Re-export the entire pak_types module for advanced usage
#[doc(inline)]
pub use pak_types;
