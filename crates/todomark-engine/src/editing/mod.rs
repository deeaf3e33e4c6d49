//! The editing core: buffer, hunks and stable identity.
//!
//! [`Document`] owns an xi-rope buffer and derives the todo model from it.
//! All mutation flows through [`TextDiffHunk`] batches; applying a batch
//! transforms the identity anchors through each delta so todo ids survive
//! edits that do not remove their markers.

pub(crate) mod anchors;
pub mod document;
pub mod hunk;
pub mod patch;

pub use document::{Document, DocumentError, DocumentId};
pub use hunk::TextDiffHunk;
pub use patch::Patch;
