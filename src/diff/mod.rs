//! Change Classifier.
//!
//! Token-level diffing of (original, corrected) text pairs with
//! noise suppression. `tokenize` and `lcs` are the primitives; `classify`
//! is the stage entry point.

pub mod classify;
pub mod lcs;
pub mod tokenize;

pub use classify::{classify, has_meaningful_changes, DiffKind, DiffSpan};
