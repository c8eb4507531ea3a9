//! Revision document model.
//!
//! Converts a classified span sequence into the run structure a word
//! processor's native revision tracking expects: deletions keep their text
//! but are flagged, insertions are new flagged runs, unchanged text is a
//! plain run. The crate acts as the sole editor of record: one synthetic
//! author and one timestamp per document, revision ids increasing from 1.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::config::REVISION_AUTHOR;
use crate::diff::{DiffKind, DiffSpan};

/// Errors from building a revision document. Recovered by the fallback
/// ladder, never surfaced to callers directly.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("diff spans leave a gap in the original text: expected offset {expected}, span starts at {found}")]
    SpanGap { expected: usize, found: usize },

    #[error("diff span at offset {offset} has no text on either side")]
    EmptySpan { offset: usize },
}

/// Change status of one contiguous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKind {
    Unchanged,
    Inserted,
    Deleted,
}

/// A contiguous block of text with one change status.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionRun {
    pub text: String,
    pub kind: RevisionKind,
    /// Monotonic id for flagged runs; `None` for unchanged text.
    pub revision_id: Option<u32>,
}

/// The structured tracked-changes document handed to the document writer.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionDocument {
    pub runs: Vec<RevisionRun>,
    pub author: String,
    /// ISO-8601 UTC timestamp shared by every revision in the document.
    pub timestamp: String,
}

/// Build a [`RevisionDocument`] from classified spans.
///
/// For replacements the deleted run is emitted before the inserted run —
/// word processors expect deletion-before-insertion at the same logical
/// position. The span sequence is validated for offset gaps; a malformed
/// sequence is an error for the caller (the fallback ladder) to recover.
pub fn render(spans: &[DiffSpan]) -> Result<RevisionDocument, RenderError> {
    let mut runs = Vec::with_capacity(spans.len() + spans.len() / 2);
    let mut next_id = 1u32;
    let mut expected_offset = 0usize;

    for span in spans {
        if span.start_offset != expected_offset {
            return Err(RenderError::SpanGap {
                expected: expected_offset,
                found: span.start_offset,
            });
        }
        expected_offset += span.original_text.len();

        match span.kind {
            DiffKind::Equal => {
                if span.original_text.is_empty() {
                    return Err(RenderError::EmptySpan {
                        offset: span.start_offset,
                    });
                }
                runs.push(RevisionRun {
                    text: span.original_text.clone(),
                    kind: RevisionKind::Unchanged,
                    revision_id: None,
                });
            }
            DiffKind::Delete => {
                push_flagged(&mut runs, &mut next_id, &span.original_text, RevisionKind::Deleted);
            }
            DiffKind::Insert => {
                push_flagged(&mut runs, &mut next_id, &span.corrected_text, RevisionKind::Inserted);
            }
            DiffKind::Replace => {
                // Deletion first, then the replacement text.
                push_flagged(&mut runs, &mut next_id, &span.original_text, RevisionKind::Deleted);
                push_flagged(&mut runs, &mut next_id, &span.corrected_text, RevisionKind::Inserted);
            }
        }
    }

    Ok(RevisionDocument {
        runs,
        author: REVISION_AUTHOR.to_string(),
        timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    })
}

fn push_flagged(runs: &mut Vec<RevisionRun>, next_id: &mut u32, text: &str, kind: RevisionKind) {
    if text.is_empty() {
        return;
    }
    runs.push(RevisionRun {
        text: text.to_string(),
        kind,
        revision_id: Some(*next_id),
    });
    *next_id += 1;
}

impl RevisionDocument {
    /// Concatenation of the runs visible in the original document
    /// (unchanged + deleted). Reconstructs the original text exactly.
    pub fn original_text(&self) -> String {
        self.runs
            .iter()
            .filter(|run| run.kind != RevisionKind::Inserted)
            .map(|run| run.text.as_str())
            .collect()
    }

    /// Concatenation of the runs visible after accepting all revisions
    /// (unchanged + inserted). Reconstructs the corrected text exactly.
    pub fn corrected_text(&self) -> String {
        self.runs
            .iter()
            .filter(|run| run.kind != RevisionKind::Deleted)
            .map(|run| run.text.as_str())
            .collect()
    }

    /// Number of flagged (inserted or deleted) runs.
    pub fn revision_count(&self) -> usize {
        self.runs.iter().filter(|run| run.revision_id.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisPolicy;
    use crate::diff::classify;

    fn spans(original: &str, corrected: &str) -> Vec<DiffSpan> {
        classify(original, corrected, &SynthesisPolicy::default())
    }

    // ── Run structure ───────────────────────────────────────

    #[test]
    fn identical_text_single_unchanged_run() {
        let doc = render(&spans("The cat sat.", "The cat sat.")).unwrap();
        assert_eq!(doc.runs.len(), 1);
        assert_eq!(doc.runs[0].kind, RevisionKind::Unchanged);
        assert_eq!(doc.runs[0].revision_id, None);
        assert_eq!(doc.revision_count(), 0);
    }

    #[test]
    fn replace_emits_deletion_before_insertion() {
        let doc = render(&spans("The cat sat.", "The cats sat.")).unwrap();
        let flagged: Vec<&RevisionRun> =
            doc.runs.iter().filter(|r| r.revision_id.is_some()).collect();
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].kind, RevisionKind::Deleted);
        assert_eq!(flagged[0].text, "cat");
        assert_eq!(flagged[1].kind, RevisionKind::Inserted);
        assert_eq!(flagged[1].text, "cats");
    }

    #[test]
    fn revision_ids_monotonic_from_one() {
        let doc = render(&spans("one two three", "1 two 3")).unwrap();
        let ids: Vec<u32> = doc.runs.iter().filter_map(|r| r.revision_id).collect();
        assert!(!ids.is_empty());
        assert_eq!(ids[0], 1);
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn author_and_timestamp_populated() {
        let doc = render(&spans("a word", "a term")).unwrap();
        assert_eq!(doc.author, REVISION_AUTHOR);
        assert!(doc.timestamp.ends_with('Z'));
        assert!(doc.timestamp.contains('T'));
    }

    // ── Double round-trip invariant ─────────────────────────

    #[test]
    fn projections_reconstruct_both_sources() {
        let cases = [
            ("The cat sat.", "The cats sat."),
            ("delete me entirely", ""),
            ("", "all new text"),
            ("約140位會員出席", "約140位會員準時出席"),
            ("same on both sides", "same on both sides"),
        ];
        for (original, corrected) in cases {
            let doc = render(&spans(original, corrected)).unwrap();
            assert_eq!(doc.original_text(), original, "original projection");
            assert_eq!(doc.corrected_text(), corrected, "corrected projection");
        }
    }

    #[test]
    fn suppressed_noise_keeps_projections_exact() {
        // The double space is suppressed; both projections must still be
        // complete documents (the rejected edit resolves to the original).
        let doc = render(&spans("word one two", "word one  two")).unwrap();
        assert_eq!(doc.original_text(), "word one two");
        assert_eq!(doc.corrected_text(), "word one two");
        assert_eq!(doc.revision_count(), 0);
    }

    // ── Validation ──────────────────────────────────────────

    #[test]
    fn gap_in_spans_is_an_error() {
        let mut gapped = spans("one two three", "one 2 three");
        // Simulate an upstream bug: shift a span's offset.
        let last = gapped.len() - 1;
        gapped[last].start_offset += 3;
        let err = render(&gapped).unwrap_err();
        assert!(matches!(err, RenderError::SpanGap { .. }));
    }

    #[test]
    fn empty_equal_span_is_an_error() {
        let bad = vec![DiffSpan {
            kind: DiffKind::Equal,
            original_text: String::new(),
            corrected_text: String::new(),
            start_offset: 0,
        }];
        assert!(matches!(render(&bad), Err(RenderError::EmptySpan { .. })));
    }

    #[test]
    fn empty_span_list_renders_empty_document() {
        let doc = render(&[]).unwrap();
        assert!(doc.runs.is_empty());
        assert_eq!(doc.original_text(), "");
        assert_eq!(doc.corrected_text(), "");
    }
}
