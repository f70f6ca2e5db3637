//! Domain models for bookwright.
//!
//! # Core Concepts
//!
//! ## Documents
//!
//! - [`DocumentKind`]: The documents a manuscript is made of (outline, bible, chapters).
//!   The outline and bible are opaque Markdown; chapters are addressed by [`ChapterNumber`].
//!
//! ## Ephemeral Values
//!
//! These exist only for the duration of a single generation call:
//!
//! - [`Prompt`]: A system/user instruction pair sent to the model.

mod chapter;
mod document;
mod prompt;

pub use chapter::*;
pub use document::*;
pub use prompt::*;
