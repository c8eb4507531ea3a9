//! Marker Protector.
//!
//! Shields substrings whose exact form must survive the external reviewer
//! (dates, counts, measurements, references) behind opaque markers, and
//! restores them afterward. Stateless across sessions: each call to
//! [`protect`] returns a self-contained [`ProtectionSession`].

pub mod patterns;
pub mod session;

pub use patterns::PatternKind;
pub use session::{protect, ProtectedSpan, ProtectionSession};
