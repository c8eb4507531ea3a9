//! Protection sessions: marker substitution and best-effort restoration.
//!
//! `protect` swaps every pattern match for an opaque marker before the text
//! is handed to the external reviewer; `restore` reverses the substitution
//! afterward. Restoration never fails — a reviewer that dropped or mangled a
//! marker costs us that one span, not the document.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::Mistake;
use crate::protect::patterns::{PatternKind, PROTECTION_PATTERNS};

/// Marker prefix. Letters only: a marker must never contain digits,
/// whitespace, or punctuation, otherwise it could itself match a protection
/// pattern or attract the reviewer's punctuation fixes.
const MARKER_PREFIX: &str = "PROTECTED";

/// Number of letters appended to the prefix.
const MARKER_SUFFIX_LEN: usize = 12;

/// One substring shielded from the reviewer.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectedSpan {
    /// The exact original substring, restored byte-for-byte.
    pub original: String,
    /// The opaque token substituted into the outgoing text.
    pub marker: String,
    pub kind: PatternKind,
}

/// Everything needed to reverse one protection pass.
///
/// Created once per request, consumed by one restoration call, never
/// persisted. Spans are ordered by their position in the input.
#[derive(Debug, Serialize)]
pub struct ProtectionSession {
    pub spans: Vec<ProtectedSpan>,
    pub protected_text: String,
}

/// Scan `text` against the ordered pattern table and replace every match
/// with a fresh unique marker.
///
/// Matches never overlap: a claim set tracks byte ranges already taken, so
/// the standalone-number catch-all cannot fragment a span an earlier, more
/// specific category already protected. A text with no protectable content
/// yields `protected_text == text` verbatim.
pub fn protect(text: &str) -> ProtectionSession {
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut located: Vec<(usize, usize, ProtectedSpan)> = Vec::new();
    let mut seen_markers: HashSet<String> = HashSet::new();

    for pattern in PROTECTION_PATTERNS.iter() {
        for m in pattern.regex.find_iter(text) {
            if overlaps_claimed(&claimed, m.start(), m.end()) {
                continue;
            }
            claimed.push((m.start(), m.end()));
            let marker = new_marker(&mut seen_markers);
            tracing::debug!(
                kind = %pattern.kind,
                original = m.as_str(),
                %marker,
                "protected {}",
                pattern.description
            );
            located.push((
                m.start(),
                m.end(),
                ProtectedSpan {
                    original: m.as_str().to_string(),
                    marker,
                    kind: pattern.kind,
                },
            ));
        }
    }

    located.sort_by_key(|(start, _, _)| *start);

    let mut protected_text = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end, span) in &located {
        protected_text.push_str(&text[cursor..*start]);
        protected_text.push_str(&span.marker);
        cursor = *end;
    }
    protected_text.push_str(&text[cursor..]);

    ProtectionSession {
        spans: located.into_iter().map(|(_, _, span)| span).collect(),
        protected_text,
    }
}

impl ProtectionSession {
    /// True when the input contained nothing to protect.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Replace every marker present in `text` with its original substring.
    ///
    /// Best-effort by design: markers the reviewer dropped are logged and
    /// skipped, markers echoed more than once restore identically each time,
    /// and a truncated marker stays in the text as literal characters.
    pub fn restore(&self, text: &str) -> String {
        let mut restored = text.to_string();
        let mut missing = 0usize;

        for span in &self.spans {
            if restored.contains(&span.marker) {
                restored = restored.replace(&span.marker, &span.original);
                tracing::debug!(marker = %span.marker, original = %span.original, "restored span");
            } else {
                missing += 1;
                tracing::warn!(
                    marker = %span.marker,
                    original = %span.original,
                    "marker absent from reviewer output, span lost"
                );
            }
        }

        if missing > 0 {
            tracing::warn!(
                restored = self.spans.len() - missing,
                missing,
                "restoration incomplete"
            );
        }

        restored
    }

    /// Prompt block instructing the reviewer to leave markers untouched.
    /// `None` when nothing was protected.
    pub fn reviewer_instructions(&self) -> Option<String> {
        if self.spans.is_empty() {
            return None;
        }
        Some(format!(
            "\n\n***PROTECTED CONTENT:\n\
             This text contains {count} placeholders starting with {prefix}.\n\
             They stand for numbers, dates, references, and links that must stay \
             in their original form.\n\
             DO NOT modify, translate, reorder, or delete these placeholders.\n\
             NEVER convert numerals to spelled-out words.\n\
             Keep every {prefix}* token exactly as it appears.\n",
            count = self.spans.len(),
            prefix = MARKER_PREFIX,
        ))
    }

    /// Rewrite marker references inside mistake descriptions back to the
    /// values they stand for. Descriptions that are purely about marker
    /// substitution are replaced with a generic readable note rather than
    /// passed through or deleted.
    pub fn restore_into_mistakes(&self, mistakes: Vec<Mistake>) -> Vec<Mistake> {
        mistakes
            .into_iter()
            .map(|mistake| {
                let mentions_marker = self
                    .spans
                    .iter()
                    .any(|span| mistake.description.contains(&span.marker));

                if mentions_marker && is_marker_note(&mistake.description) {
                    tracing::debug!(description = %mistake.description, "rewrote marker-substitution note");
                    return Mistake {
                        description: MARKER_NOTE_REWRITE.to_string(),
                    };
                }

                let mut description = mistake.description;
                for span in &self.spans {
                    if description.contains(&span.marker) {
                        description = description.replace(
                            &format!("標記 {}", span.marker),
                            &format!("原文中的數字「{}」", span.original),
                        );
                        description = description.replace(
                            &format!("Marker {}", span.marker),
                            &format!("original number '{}'", span.original),
                        );
                        description = description.replace(&span.marker, &span.original);
                    }
                }
                Mistake { description }
            })
            .collect()
    }
}

/// Stand-in for a mistake entry that only narrated marker substitution.
const MARKER_NOTE_REWRITE: &str = "數字格式已按照編輯指引修正：原文的數字表達已調整為規範格式";

/// A description that only narrates marker substitution, not a correction:
/// it must both talk about a 標記 and say it 應替換為 something. Merely
/// mentioning a marker or a placeholder is a genuine correction and is kept.
fn is_marker_note(description: &str) -> bool {
    description.contains("標記") && description.contains("應替換為")
}

fn overlaps_claimed(claimed: &[(usize, usize)], start: usize, end: usize) -> bool {
    claimed.iter().any(|&(s, e)| start < e && s < end)
}

/// Allocate a marker unique within the session. Letters only (hex digits of
/// a v4 UUID mapped onto A–P) so no pattern category can re-match it.
fn new_marker(seen: &mut HashSet<String>) -> String {
    loop {
        let hex = Uuid::new_v4().simple().to_string();
        let letters: String = hex
            .bytes()
            .take(MARKER_SUFFIX_LEN)
            .map(|b| {
                let value = match b {
                    b'0'..=b'9' => b - b'0',
                    b'a'..=b'f' => b - b'a' + 10,
                    _ => 0,
                };
                (b'A' + value) as char
            })
            .collect();
        let marker = format!("{MARKER_PREFIX}{letters}");
        if seen.insert(marker.clone()) {
            return marker;
        }
    }
}
