//! Crate constants and tunable policy.
//!
//! Noise-suppression thresholds are heuristics, not derived constants; they
//! live here as policy structs with defaults so product tuning does not mean
//! hunting for inline numbers.

use serde::{Deserialize, Serialize};

pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Synthetic author of record for every tracked revision.
pub const REVISION_AUTHOR: &str = "Proofreader";

/// Default `RUST_LOG`-style filter for the embedding application.
pub fn default_log_filter() -> String {
    "info,redmark=debug".to_string()
}

/// Thresholds deciding which diff spans are cosmetic noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoisePolicy {
    /// A pure-whitespace difference of at most this many characters is
    /// suppressed.
    pub max_whitespace_noise: usize,
    /// Suppress replacements whose letter/digit content is identical and
    /// which differ by a single leading or trailing punctuation/space
    /// character per side.
    pub suppress_edge_punctuation: bool,
    /// Suppress spans whose sides are equal after case folding and
    /// whitespace collapse.
    pub suppress_case_and_spacing: bool,
}

impl Default for NoisePolicy {
    fn default() -> Self {
        Self {
            max_whitespace_noise: 2,
            suppress_edge_punctuation: true,
            suppress_case_and_spacing: true,
        }
    }
}

/// Cost guard for the diff computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffPolicy {
    /// Upper bound on LCS table cells (token count product). Above this the
    /// classifier degrades to one whole-text replacement instead of failing.
    pub max_lcs_cells: usize,
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self {
            max_lcs_cells: 4_000_000,
        }
    }
}

/// Combined pipeline policy, carried by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisPolicy {
    pub noise: NoisePolicy,
    pub diff: DiffPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_whitespace_threshold_is_two() {
        assert_eq!(NoisePolicy::default().max_whitespace_noise, 2);
    }

    #[test]
    fn default_suppression_rules_enabled() {
        let policy = NoisePolicy::default();
        assert!(policy.suppress_edge_punctuation);
        assert!(policy.suppress_case_and_spacing);
    }

    #[test]
    fn policy_round_trips_through_json() {
        let policy = SynthesisPolicy::default();
        let json = serde_json::to_string(&policy).unwrap();
        let back: SynthesisPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.noise.max_whitespace_noise, policy.noise.max_whitespace_noise);
        assert_eq!(back.diff.max_lcs_cells, policy.diff.max_lcs_cells);
    }

    #[test]
    fn default_log_filter_mentions_crate() {
        assert!(default_log_filter().contains("redmark"));
    }
}
