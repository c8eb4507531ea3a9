//! redmark — correction synthesis for LLM-assisted proofreading.
//!
//! Takes user text, shields content whose exact form must survive an
//! external reviewer (dates, counts, measurements, references), and turns
//! the reviewer's output into a Word-style tracked-changes document through
//! a three-tier fallback ladder. The HTTP surface and the reviewer's API
//! live in the embedding application; this crate is the pipeline between
//! them.

pub mod config;
pub mod diff; // token diff + noise suppression
pub mod fallback; // three-tier artifact ladder
pub mod pipeline; // orchestrator + reviewer seam
pub mod protect; // marker protection sessions
pub mod render; // revision document + WordprocessingML

pub use fallback::{ArtifactOutput, DocumentWriter, FallbackLadder, Tier};
pub use pipeline::{
    Mistake, ReviewError, ReviewOutcome, Reviewer, SynthesisError, SynthesisOutcome, Synthesizer,
};
pub use protect::{protect, ProtectionSession};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding the pipeline. Library code
/// itself only emits events; calling this is the application's choice.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
