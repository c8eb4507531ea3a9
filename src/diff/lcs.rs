//! Token alignment via longest common subsequence.
//!
//! Produces a minimal edit script over token slices. The DP table is bounded
//! by a cell budget: pathological inputs (two long, completely disjoint
//! texts) return `None` instead of burning quadratic time and memory, and
//! the caller degrades to a single whole-text replacement.

use std::ops::Range;

/// Kind of an aligned region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// One region of the edit script, with token index ranges into both inputs.
///
/// For `Equal` both ranges have the same length; for `Delete` the b-range is
/// empty, for `Insert` the a-range is empty, for `Replace` both are
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub kind: OpKind,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

/// Align two token slices. Returns `None` when `a.len() * b.len()` exceeds
/// `max_cells` — the degenerate-input guard.
///
/// Adjacent delete/insert regions between two equal runs are coalesced into
/// a single `Replace`, with the deleted side always ordered first.
pub fn align<T: PartialEq>(a: &[T], b: &[T], max_cells: usize) -> Option<Vec<Opcode>> {
    let m = a.len();
    let n = b.len();
    if m.saturating_mul(n) > max_cells {
        return None;
    }

    // dp[i][j] = LCS length of a[i..] and b[j..], laid out row-major.
    let width = n + 1;
    let mut dp = vec![0u32; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            dp[i * width + j] = if a[i] == b[j] {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    // Forward walk; ties prefer deletion so removals come before additions.
    #[derive(Clone, Copy, PartialEq)]
    enum Step {
        Keep,
        Del,
        Ins,
    }
    let mut steps = Vec::with_capacity(m + n);
    let (mut i, mut j) = (0usize, 0usize);
    while i < m && j < n {
        if a[i] == b[j] {
            steps.push(Step::Keep);
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            steps.push(Step::Del);
            i += 1;
        } else {
            steps.push(Step::Ins);
            j += 1;
        }
    }
    steps.extend(std::iter::repeat(Step::Del).take(m - i));
    steps.extend(std::iter::repeat(Step::Ins).take(n - j));

    // Group steps into opcodes. Everything between two equal runs collapses
    // into one Delete, Insert, or Replace region.
    let mut ops: Vec<Opcode> = Vec::new();
    let (mut ai, mut bi) = (0usize, 0usize);
    let mut idx = 0usize;
    while idx < steps.len() {
        if steps[idx] == Step::Keep {
            let (a_start, b_start) = (ai, bi);
            while idx < steps.len() && steps[idx] == Step::Keep {
                ai += 1;
                bi += 1;
                idx += 1;
            }
            ops.push(Opcode {
                kind: OpKind::Equal,
                a: a_start..ai,
                b: b_start..bi,
            });
        } else {
            let (a_start, b_start) = (ai, bi);
            while idx < steps.len() && steps[idx] != Step::Keep {
                match steps[idx] {
                    Step::Del => ai += 1,
                    Step::Ins => bi += 1,
                    Step::Keep => unreachable!(),
                }
                idx += 1;
            }
            let kind = match (a_start < ai, b_start < bi) {
                (true, true) => OpKind::Replace,
                (true, false) => OpKind::Delete,
                (false, true) => OpKind::Insert,
                (false, false) => unreachable!("empty edit region"),
            };
            ops.push(Opcode {
                kind,
                a: a_start..ai,
                b: b_start..bi,
            });
        }
    }

    Some(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(ops: &[Opcode]) -> Vec<OpKind> {
        ops.iter().map(|op| op.kind).collect()
    }

    #[test]
    fn identical_slices_single_equal() {
        let a = ["the", " ", "cat"];
        let ops = align(&a, &a, usize::MAX).unwrap();
        assert_eq!(kinds(&ops), vec![OpKind::Equal]);
        assert_eq!(ops[0].a, 0..3);
        assert_eq!(ops[0].b, 0..3);
    }

    #[test]
    fn single_word_replace() {
        let a = ["The", " ", "cat", " ", "sat"];
        let b = ["The", " ", "cats", " ", "sat"];
        let ops = align(&a, &b, usize::MAX).unwrap();
        assert_eq!(kinds(&ops), vec![OpKind::Equal, OpKind::Replace, OpKind::Equal]);
        assert_eq!(ops[1].a, 2..3);
        assert_eq!(ops[1].b, 2..3);
    }

    #[test]
    fn pure_insertion() {
        let a = ["a", "c"];
        let b = ["a", "b", "c"];
        let ops = align(&a, &b, usize::MAX).unwrap();
        assert_eq!(kinds(&ops), vec![OpKind::Equal, OpKind::Insert, OpKind::Equal]);
    }

    #[test]
    fn pure_deletion() {
        let a = ["a", "b", "c"];
        let b = ["a", "c"];
        let ops = align(&a, &b, usize::MAX).unwrap();
        assert_eq!(kinds(&ops), vec![OpKind::Equal, OpKind::Delete, OpKind::Equal]);
    }

    #[test]
    fn empty_against_nonempty() {
        let a: [&str; 0] = [];
        let b = ["x"];
        let ops = align(&a, &b, usize::MAX).unwrap();
        assert_eq!(kinds(&ops), vec![OpKind::Insert]);

        let ops = align(&b, &a, usize::MAX).unwrap();
        assert_eq!(kinds(&ops), vec![OpKind::Delete]);
    }

    #[test]
    fn both_empty_yields_no_ops() {
        let a: [&str; 0] = [];
        assert!(align(&a, &a, usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn ranges_cover_both_inputs_without_gaps() {
        let a = ["x", "y", "z", "w"];
        let b = ["x", "q", "w", "v"];
        let ops = align(&a, &b, usize::MAX).unwrap();
        let (mut ai, mut bi) = (0usize, 0usize);
        for op in &ops {
            assert_eq!(op.a.start, ai);
            assert_eq!(op.b.start, bi);
            ai = op.a.end;
            bi = op.b.end;
        }
        assert_eq!(ai, a.len());
        assert_eq!(bi, b.len());
    }

    #[test]
    fn cell_budget_exceeded_returns_none() {
        let a = ["t"; 100];
        let b = ["u"; 100];
        assert!(align(&a, &b, 100 * 100 - 1).is_none());
        assert!(align(&a, &b, 100 * 100).is_some());
    }

    #[test]
    fn disjoint_inputs_single_replace() {
        let a = ["entirely", " ", "different"];
        let b = ["nothing", " ", "shared"];
        let ops = align(&a, &b, usize::MAX).unwrap();
        // The shared space token keeps this from being one big replace, but
        // every non-equal region must still be a coalesced Replace.
        assert!(ops
            .iter()
            .all(|op| matches!(op.kind, OpKind::Equal | OpKind::Replace)));
    }
}
