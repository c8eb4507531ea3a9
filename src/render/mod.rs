//! Revision Renderer.
//!
//! `revision` builds the structured tracked-changes document from classified
//! spans; `word_markup` serializes it (and the simpler fallback tiers) into
//! WordprocessingML.

pub mod revision;
pub mod word_markup;

pub use revision::{render, RenderError, RevisionDocument, RevisionKind, RevisionRun};
