//! Pipeline Orchestrator.
//!
//! Entry point consumed by the HTTP layer. Sequences protection, the
//! external reviewer call, restoration, classification, and artifact
//! production. Stateless: every call builds and discards its own
//! `ProtectionSession` and diff structures, so concurrent requests need no
//! coordination.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SynthesisPolicy;
use crate::diff::{classify, has_meaningful_changes};
use crate::fallback::{ArtifactError, FallbackLadder, Tier};
use crate::protect;

// ---------------------------------------------------------------------------
// Reviewer seam
// ---------------------------------------------------------------------------

/// One correction reported by the reviewer. Opaque: carried through
/// unchanged apart from marker cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub description: String,
}

/// What the external reviewer returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub corrected_text: String,
    pub mistakes: Vec<Mistake>,
}

/// Failure from the external reviewer collaborator.
#[derive(Debug, Error)]
#[error("reviewer call failed: {0}")]
pub struct ReviewError(pub String);

/// The external language-model reviewer, injected by the caller. Must
/// tolerate being handed marker-protected text; whether markers come back
/// verbatim, partially, or not at all is handled downstream.
pub trait Reviewer: Send + Sync {
    fn review(&self, text: &str, instructions: Option<&str>) -> Result<ReviewOutcome, ReviewError>;
}

// ---------------------------------------------------------------------------
// Errors and outcome
// ---------------------------------------------------------------------------

/// The only errors a caller ever sees. Everything else is recovered inside
/// the pipeline.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("could not produce a corrected document: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Result of one synthesis call.
#[derive(Debug, Serialize)]
pub struct SynthesisOutcome {
    /// The produced artifact bytes.
    pub artifact: Vec<u8>,
    /// Which fallback tier produced the artifact.
    pub tier: Tier,
    /// The classifier's single meaningful-changes decision.
    pub meaningful_changes: bool,
    /// Corrected text after marker restoration.
    pub corrected_text: String,
    /// Mistake descriptions after marker cleanup.
    pub mistakes: Vec<Mistake>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives one proofreading request through the synthesis pipeline.
pub struct Synthesizer {
    policy: SynthesisPolicy,
    ladder: FallbackLadder,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(SynthesisPolicy::default(), FallbackLadder::word_markup())
    }
}

impl Synthesizer {
    pub fn new(policy: SynthesisPolicy, ladder: FallbackLadder) -> Self {
        Self { policy, ladder }
    }

    /// Synthesis entry point for callers that already hold a corrected text:
    /// classification, rendering, and the fallback ladder.
    pub fn synthesize(
        &self,
        original: &str,
        corrected: &str,
        mistakes: Vec<Mistake>,
    ) -> Result<SynthesisOutcome, SynthesisError> {
        let spans = classify(original, corrected, &self.policy);
        // Computed exactly once; every downstream tier decision reuses it.
        let meaningful = has_meaningful_changes(&spans);

        let output = self
            .ladder
            .produce(original, corrected, &spans, meaningful, &mistakes)?;

        tracing::info!(
            tier = %output.tier,
            meaningful,
            spans = spans.len(),
            mistakes = mistakes.len(),
            "synthesis complete"
        );

        Ok(SynthesisOutcome {
            artifact: output.bytes,
            tier: output.tier,
            meaningful_changes: meaningful,
            corrected_text: corrected.to_string(),
            mistakes,
        })
    }

    /// Full sequence: protect, call the reviewer, restore, clean up mistake
    /// descriptions, then synthesize.
    pub fn proofread(
        &self,
        reviewer: &dyn Reviewer,
        text: &str,
    ) -> Result<SynthesisOutcome, SynthesisError> {
        let session = protect::protect(text);
        if session.is_empty() {
            tracing::debug!("no protectable spans, protection skipped");
        } else {
            tracing::info!(spans = session.spans.len(), "protected input spans");
        }

        let instructions = session.reviewer_instructions();
        let outcome = reviewer.review(&session.protected_text, instructions.as_deref())?;

        let corrected = session.restore(&outcome.corrected_text);
        let mistakes = session.restore_into_mistakes(outcome.mistakes);

        self.synthesize(text, &corrected, mistakes)
    }
}
