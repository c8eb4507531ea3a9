//! Fallback Ladder.
//!
//! Three escalating strategies for producing an output artifact, tried in
//! order with a uniform attempt contract: full tracked revisions, then a
//! coarse highlighted document, then plain corrected text. Earlier tiers are
//! never re-attempted. Tier transitions are degraded-mode events, not
//! errors; only all three tiers failing surfaces to the caller.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::diff::DiffSpan;
use crate::pipeline::Mistake;
use crate::render::word_markup;
use crate::render::{render, RenderError};

/// Note attached to the tier-1 document when the reviewer found nothing to
/// change. This outcome is a success, not a degradation.
const NO_CORRECTIONS_NOTE: &str =
    "No corrections needed: the text already conforms to the style guidelines.";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failure reported by a document writer implementation.
#[derive(Debug, Error)]
#[error("document writer failed: {0}")]
pub struct WriteError(pub String);

/// Failure of one ladder tier.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("revision rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("all fallback tiers failed; last error: {0}")]
    Exhausted(String),
}

// ---------------------------------------------------------------------------
// Tiers and output
// ---------------------------------------------------------------------------

/// Which strategy produced the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    TrackedRevisions,
    Highlighted,
    Plain,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrackedRevisions => write!(f, "tracked_revisions"),
            Self::Highlighted => write!(f, "highlighted"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// A produced artifact plus the tier that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactOutput {
    pub bytes: Vec<u8>,
    pub tier: Tier,
}

// ---------------------------------------------------------------------------
// Document writer seam
// ---------------------------------------------------------------------------

/// The external document-writing collaborator, injected so tests can force
/// per-tier failures and callers can swap the artifact format.
pub trait DocumentWriter: Send + Sync {
    /// Full tracked-revisions artifact.
    fn write_tracked(
        &self,
        doc: &crate::render::RevisionDocument,
        mistakes: &[Mistake],
    ) -> Result<Vec<u8>, WriteError>;

    /// Coarse color-coded artifact without per-run revision metadata.
    fn write_highlighted(
        &self,
        original: &str,
        corrected: &str,
        mistakes: &[Mistake],
    ) -> Result<Vec<u8>, WriteError>;

    /// Minimal plain artifact. Must not diff; should not fail under normal
    /// conditions.
    fn write_plain(&self, corrected: &str, mistakes: &[Mistake]) -> Result<Vec<u8>, WriteError>;
}

/// Default writer: WordprocessingML markup via [`word_markup`].
pub struct WordMarkupWriter;

impl DocumentWriter for WordMarkupWriter {
    fn write_tracked(
        &self,
        doc: &crate::render::RevisionDocument,
        mistakes: &[Mistake],
    ) -> Result<Vec<u8>, WriteError> {
        let body = word_markup::tracked_body(doc, mistakes);
        Ok(word_markup::document_xml(&body).into_bytes())
    }

    fn write_highlighted(
        &self,
        original: &str,
        corrected: &str,
        mistakes: &[Mistake],
    ) -> Result<Vec<u8>, WriteError> {
        let body = word_markup::highlighted_body(original, corrected, mistakes);
        Ok(word_markup::document_xml(&body).into_bytes())
    }

    fn write_plain(&self, corrected: &str, mistakes: &[Mistake]) -> Result<Vec<u8>, WriteError> {
        let body = word_markup::plain_body(corrected, mistakes);
        Ok(word_markup::document_xml(&body).into_bytes())
    }
}

// ---------------------------------------------------------------------------
// The ladder
// ---------------------------------------------------------------------------

/// Orchestrates the three tiers. The only component that knows about
/// cross-pipeline failure handling.
pub struct FallbackLadder {
    writer: Box<dyn DocumentWriter>,
}

impl FallbackLadder {
    pub fn new(writer: Box<dyn DocumentWriter>) -> Self {
        Self { writer }
    }

    /// Ladder over the default WordprocessingML writer.
    pub fn word_markup() -> Self {
        Self::new(Box::new(WordMarkupWriter))
    }

    /// Produce an artifact, escalating tiers on failure.
    ///
    /// `meaningful` is the classifier's single `has_meaningful_changes`
    /// decision, computed once upstream so every tier sees the same answer.
    pub fn produce(
        &self,
        original: &str,
        corrected: &str,
        spans: &[DiffSpan],
        meaningful: bool,
        mistakes: &[Mistake],
    ) -> Result<ArtifactOutput, ArtifactError> {
        let tiers: [(Tier, AttemptFn<'_>); 3] = [
            (Tier::TrackedRevisions, Box::new(|| self.attempt_tracked(spans, meaningful, mistakes))),
            (Tier::Highlighted, Box::new(|| self.attempt_highlighted(original, corrected, mistakes))),
            (Tier::Plain, Box::new(|| self.attempt_plain(corrected, mistakes))),
        ];

        let mut last_error = String::new();
        for (tier, attempt) in tiers {
            match attempt() {
                Ok(bytes) => {
                    if tier != Tier::TrackedRevisions {
                        tracing::warn!(%tier, "artifact produced in degraded mode");
                    }
                    return Ok(ArtifactOutput { bytes, tier });
                }
                Err(err) => {
                    tracing::warn!(%tier, error = %err, "fallback tier failed, escalating");
                    last_error = err.to_string();
                }
            }
        }

        Err(ArtifactError::Exhausted(last_error))
    }

    fn attempt_tracked(
        &self,
        spans: &[DiffSpan],
        meaningful: bool,
        mistakes: &[Mistake],
    ) -> Result<Vec<u8>, ArtifactError> {
        let doc = render(spans)?;
        if meaningful {
            Ok(self.writer.write_tracked(&doc, mistakes)?)
        } else {
            let note = [Mistake {
                description: NO_CORRECTIONS_NOTE.to_string(),
            }];
            Ok(self.writer.write_tracked(&doc, &note)?)
        }
    }

    fn attempt_highlighted(
        &self,
        original: &str,
        corrected: &str,
        mistakes: &[Mistake],
    ) -> Result<Vec<u8>, ArtifactError> {
        Ok(self.writer.write_highlighted(original, corrected, mistakes)?)
    }

    fn attempt_plain(
        &self,
        corrected: &str,
        mistakes: &[Mistake],
    ) -> Result<Vec<u8>, ArtifactError> {
        Ok(self.writer.write_plain(corrected, mistakes)?)
    }
}

type AttemptFn<'a> = Box<dyn Fn() -> Result<Vec<u8>, ArtifactError> + 'a>;
