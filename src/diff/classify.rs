//! Change classification: token diff plus noise suppression.
//!
//! Turns an (original, corrected) pair into an ordered, gapless sequence of
//! [`DiffSpan`]s and decides which spans are worth surfacing. Suppression
//! rejects the edit: a span demoted to `Equal` keeps the original text on
//! both sides, so concatenating either side of the result still reconstructs
//! a complete document.

use serde::Serialize;

use crate::config::SynthesisPolicy;
use crate::diff::lcs::{self, OpKind};
use crate::diff::tokenize::tokenize;

/// Kind of a classified region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// A labeled region of difference (or equality) between the two texts.
#[derive(Debug, Clone, Serialize)]
pub struct DiffSpan {
    pub kind: DiffKind,
    pub original_text: String,
    pub corrected_text: String,
    /// Byte offset of this span's original side within the original text.
    pub start_offset: usize,
}

/// Classify the corrected text against the original.
///
/// Always returns a covering span sequence: the concatenated original sides
/// equal `original` and the corrected sides equal the corrected text with
/// noise edits rejected. When the token product exceeds the diff guard the
/// result degrades to a single whole-text replacement instead of failing.
pub fn classify(original: &str, corrected: &str, policy: &SynthesisPolicy) -> Vec<DiffSpan> {
    if original == corrected {
        if original.is_empty() {
            return Vec::new();
        }
        return vec![DiffSpan {
            kind: DiffKind::Equal,
            original_text: original.to_string(),
            corrected_text: corrected.to_string(),
            start_offset: 0,
        }];
    }

    let a = tokenize(original);
    let b = tokenize(corrected);

    let Some(ops) = lcs::align(&a, &b, policy.diff.max_lcs_cells) else {
        tracing::warn!(
            original_tokens = a.len(),
            corrected_tokens = b.len(),
            max_cells = policy.diff.max_lcs_cells,
            "diff guard exceeded, degrading to whole-text replacement"
        );
        return vec![DiffSpan {
            kind: DiffKind::Replace,
            original_text: original.to_string(),
            corrected_text: corrected.to_string(),
            start_offset: 0,
        }];
    };

    let mut spans = Vec::with_capacity(ops.len());
    let mut offset = 0usize;
    for op in ops {
        let original_text = a[op.a.clone()].concat();
        let corrected_text = b[op.b.clone()].concat();
        let start_offset = offset;
        offset += original_text.len();

        let kind = match op.kind {
            OpKind::Equal => DiffKind::Equal,
            OpKind::Insert => DiffKind::Insert,
            OpKind::Delete => DiffKind::Delete,
            OpKind::Replace => DiffKind::Replace,
        };

        if kind != DiffKind::Equal && is_noise(kind, &original_text, &corrected_text, policy) {
            tracing::debug!(
                original = %original_text,
                corrected = %corrected_text,
                "suppressed cosmetic span"
            );
            // Reject the edit entirely; the original stands. A rejected
            // insertion has no original side and vanishes, otherwise it
            // would survive as an empty span the renderer refuses.
            if !original_text.is_empty() {
                spans.push(DiffSpan {
                    kind: DiffKind::Equal,
                    corrected_text: original_text.clone(),
                    original_text,
                    start_offset,
                });
            }
        } else {
            spans.push(DiffSpan {
                kind,
                original_text,
                corrected_text,
                start_offset,
            });
        }
    }

    merge_adjacent_equal(spans)
}

/// True iff at least one retained span is a real change. Computed once per
/// request and threaded through, so every consumer sees the same decision.
pub fn has_meaningful_changes(spans: &[DiffSpan]) -> bool {
    spans.iter().any(|span| span.kind != DiffKind::Equal)
}

// ---------------------------------------------------------------------------
// Noise rules
// ---------------------------------------------------------------------------

fn is_noise(kind: DiffKind, original: &str, corrected: &str, policy: &SynthesisPolicy) -> bool {
    let noise = &policy.noise;

    // Rule 1: small pure-whitespace difference.
    if is_whitespace_only(original)
        && is_whitespace_only(corrected)
        && original.chars().count().abs_diff(corrected.chars().count())
            <= noise.max_whitespace_noise
    {
        return true;
    }

    // Rule 2: replacement by a single leading/trailing punctuation or space
    // character, same letters and digits.
    if kind == DiffKind::Replace
        && noise.suppress_edge_punctuation
        && differs_by_single_edge_char(original, corrected)
    {
        return true;
    }

    // Rule 3: identical after case folding and whitespace collapse.
    // Whitespace-only spans are rule 1's territory; collapsing them here
    // would void rule 1's threshold.
    if noise.suppress_case_and_spacing
        && !(is_whitespace_only(original) && is_whitespace_only(corrected))
        && folded(original) == folded(corrected)
    {
        return true;
    }

    false
}

fn is_whitespace_only(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

fn folded(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// The two sides carry identical letters/digits and differ only by one
/// punctuation-or-space character at either end.
fn differs_by_single_edge_char(a: &str, b: &str) -> bool {
    if a == b {
        return false;
    }
    let alnum = |s: &str| s.chars().filter(|c| c.is_alphanumeric()).collect::<String>();
    if alnum(a) != alnum(b) {
        return false;
    }
    edge_variants(a)
        .iter()
        .any(|va| edge_variants(b).iter().any(|vb| va == vb))
}

/// The string itself plus the string with one non-alphanumeric edge
/// character removed.
fn edge_variants(s: &str) -> Vec<String> {
    let mut variants = vec![s.to_string()];
    let mut chars = s.chars();
    if let Some(first) = chars.next() {
        if !first.is_alphanumeric() {
            variants.push(chars.as_str().to_string());
        }
    }
    let mut chars = s.chars();
    if let Some(last) = chars.next_back() {
        if !last.is_alphanumeric() {
            variants.push(chars.as_str().to_string());
        }
    }
    variants
}

fn merge_adjacent_equal(spans: Vec<DiffSpan>) -> Vec<DiffSpan> {
    let mut merged: Vec<DiffSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(prev) if prev.kind == DiffKind::Equal && span.kind == DiffKind::Equal => {
                prev.original_text.push_str(&span.original_text);
                prev.corrected_text.push_str(&span.corrected_text);
            }
            _ => merged.push(span),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(original: &str, corrected: &str) -> Vec<DiffSpan> {
        classify(original, corrected, &SynthesisPolicy::default())
    }

    fn original_side(spans: &[DiffSpan]) -> String {
        spans
            .iter()
            .filter(|s| s.kind != DiffKind::Insert)
            .map(|s| s.original_text.as_str())
            .collect()
    }

    fn corrected_side(spans: &[DiffSpan]) -> String {
        spans
            .iter()
            .filter(|s| s.kind != DiffKind::Delete)
            .map(|s| s.corrected_text.as_str())
            .collect()
    }

    // ── Identity ────────────────────────────────────────────

    #[test]
    fn identical_inputs_single_equal_span() {
        let spans = classify_default("The cat sat.", "The cat sat.");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, DiffKind::Equal);
        assert!(!has_meaningful_changes(&spans));
    }

    #[test]
    fn classifying_text_against_itself_never_meaningful() {
        for text in ["", "a", "約140位會員出席", "multi\nline\ntext"] {
            assert!(!has_meaningful_changes(&classify_default(text, text)));
        }
    }

    // ── Real changes ────────────────────────────────────────

    #[test]
    fn single_word_change_is_replace() {
        let spans = classify_default("The cat sat.", "The cats sat.");
        let replaces: Vec<&DiffSpan> =
            spans.iter().filter(|s| s.kind == DiffKind::Replace).collect();
        assert_eq!(replaces.len(), 1);
        assert_eq!(replaces[0].original_text, "cat");
        assert_eq!(replaces[0].corrected_text, "cats");
        assert!(has_meaningful_changes(&spans));
    }

    #[test]
    fn word_insertion_detected() {
        let spans = classify_default("The sat.", "The cat sat.");
        assert!(spans.iter().any(|s| s.kind == DiffKind::Insert));
        assert!(has_meaningful_changes(&spans));
    }

    #[test]
    fn cjk_single_character_change() {
        let spans = classify_default("升旗儀式", "升旗典禮");
        assert!(has_meaningful_changes(&spans));
        assert_eq!(original_side(&spans), "升旗儀式");
        assert_eq!(corrected_side(&spans), "升旗典禮");
    }

    // ── Completeness invariant ──────────────────────────────

    #[test]
    fn sides_reconstruct_inputs() {
        let cases = [
            ("The cat sat.", "The cats sat."),
            ("abc", "xyz"),
            ("", "new text"),
            ("old text", ""),
            ("約140位會員出席", "約140位會員準時出席"),
        ];
        for (original, corrected) in cases {
            let spans = classify_default(original, corrected);
            assert_eq!(original_side(&spans), original, "original side for {original:?}");
            assert_eq!(corrected_side(&spans), corrected, "corrected side for {original:?}");
        }
    }

    #[test]
    fn start_offsets_are_gapless() {
        let spans = classify_default("one two three four", "one 2 three 4");
        let mut offset = 0usize;
        for span in &spans {
            assert_eq!(span.start_offset, offset);
            offset += span.original_text.len();
        }
    }

    // ── Noise suppression ───────────────────────────────────

    #[test]
    fn double_space_difference_suppressed() {
        let spans = classify_default("word one two", "word one  two");
        assert!(!has_meaningful_changes(&spans));
        // The rejected edit keeps the original spacing.
        assert_eq!(corrected_side(&spans), "word one two");
    }

    #[test]
    fn suppressed_insert_into_empty_original_yields_no_spans() {
        // A tiny whitespace insert into an empty text has no EQUAL neighbor
        // to merge into; the rejected edit must vanish, not linger as an
        // empty span.
        let spans = classify_default("", " ");
        assert!(spans.is_empty());
        assert!(!has_meaningful_changes(&spans));
    }

    #[test]
    fn large_whitespace_insertion_kept() {
        let spans = classify_default("a b", "a      b");
        assert!(has_meaningful_changes(&spans));
    }

    #[test]
    fn trailing_punctuation_swap_suppressed() {
        let spans = classify_default("Hello world.", "Hello world,");
        assert!(!has_meaningful_changes(&spans));
    }

    #[test]
    fn punctuation_deletion_is_meaningful() {
        // Removing a sentence terminator is a real edit, not edge noise.
        let spans = classify_default("Hello world.", "Hello world");
        assert!(has_meaningful_changes(&spans));
    }

    #[test]
    fn case_only_change_suppressed() {
        let spans = classify_default("the Cat sat", "the cat sat");
        assert!(!has_meaningful_changes(&spans));
    }

    #[test]
    fn letter_change_with_punctuation_still_meaningful() {
        let spans = classify_default("cat.", "cats");
        assert!(has_meaningful_changes(&spans));
    }

    #[test]
    fn suppression_thresholds_are_policy() {
        let mut policy = SynthesisPolicy::default();
        policy.noise.max_whitespace_noise = 0;
        policy.noise.suppress_case_and_spacing = false;
        let spans = classify("a b", "a  b", &policy);
        assert!(has_meaningful_changes(&spans));
    }

    // ── Degenerate guard ────────────────────────────────────

    #[test]
    fn guard_exceeded_degrades_to_whole_text_replace() {
        let original: String = (0..600).map(|i| format!("alpha{i} ")).collect();
        let corrected: String = (0..600).map(|i| format!("beta{i} ")).collect();
        let mut policy = SynthesisPolicy::default();
        policy.diff.max_lcs_cells = 1_000;
        let spans = classify(&original, &corrected, &policy);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, DiffKind::Replace);
        assert_eq!(spans[0].original_text, original);
        assert_eq!(spans[0].corrected_text, corrected);
    }

    #[test]
    fn empty_pair_yields_no_spans() {
        assert!(classify_default("", "").is_empty());
    }
}
