//! Protection pattern table.
//!
//! Ordered list of compiled patterns evaluated by the scan loop in
//! `session::protect`. More specific categories come first so the standalone
//! multi-digit catch-all never fragments a span already claimed by a date,
//! measurement, or ordinal pattern.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category of a protected substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Full or partial CJK date (2024年3月15日, 2024年, 3月15日).
    Date,
    /// Count with a CJK measure word (140位, 300人, 5章).
    NumericUnit,
    /// Ordinal with 第 prefix (第5樓, 第2章).
    Ordinal,
    /// Physical measurement, percentage, or money amount (25度, 95.5%, 500元).
    Measurement,
    /// Clock time component (3時, 30分).
    Time,
    /// Page range, chapter/section reference, or citation year.
    AcademicRef,
    /// Superscript footnote reference (¹²³).
    FootnoteMark,
    /// http/https link.
    Url,
    /// Email address.
    Email,
    /// Catch-all: standalone number of two or more digits.
    StandaloneNumber,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::NumericUnit => write!(f, "numeric_unit"),
            Self::Ordinal => write!(f, "ordinal"),
            Self::Measurement => write!(f, "measurement"),
            Self::Time => write!(f, "time"),
            Self::AcademicRef => write!(f, "academic_ref"),
            Self::FootnoteMark => write!(f, "footnote_mark"),
            Self::Url => write!(f, "url"),
            Self::Email => write!(f, "email"),
            Self::StandaloneNumber => write!(f, "standalone_number"),
        }
    }
}

/// A compiled protection pattern with its category metadata.
pub struct ProtectionPattern {
    pub regex: Regex,
    pub kind: PatternKind,
    pub description: &'static str,
}

/// All protection patterns, in claim-priority order.
///
/// Several entries share a `PatternKind`: percentages and money amounts are
/// both `Measurement`, page and chapter references are both `AcademicRef`.
pub static PROTECTION_PATTERNS: LazyLock<Vec<ProtectionPattern>> = LazyLock::new(|| {
    vec![
        // Links and addresses first: digits inside a URL or mailbox must be
        // claimed as part of the whole token, not by a number pattern.
        pattern(r"https?://[^\s]+", PatternKind::Url, "http(s) link"),
        pattern(
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            PatternKind::Email,
            "email address",
        ),
        pattern(
            r"\d{4}年\d{1,2}月\d{1,2}日",
            PatternKind::Date,
            "full CJK date",
        ),
        pattern(
            r"\d+(?:\.\d+)?(?:米|公尺|厘米|公分|毫米|公釐|公斤|千克|克|噸|升|毫升|攝氏度|華氏度|度)",
            PatternKind::Measurement,
            "measurement with CJK unit",
        ),
        pattern(
            r"\d+(?:\.\d+)?(?:元|港元|美元|英鎊|歐元|日圓|人民幣|新台幣)",
            PatternKind::Measurement,
            "money amount",
        ),
        pattern(r"\d+(?:\.\d+)?%", PatternKind::Measurement, "percentage"),
        pattern(
            r"第\d+(?:個|位|名|次|項|件|份|張|頁|章|節|條|款|段|行|屆|期|年|月|日|號|樓|層)",
            PatternKind::Ordinal,
            "ordinal with 第 prefix",
        ),
        pattern(
            r"\d+(?:個|位|名|人|次|項|件|份|張|頁|章|節|條|款|段|行|字|億|萬|千|百|十)",
            PatternKind::NumericUnit,
            "count with measure word",
        ),
        pattern(r"\d{1,2}(?:時|點|分|秒)", PatternKind::Time, "clock time"),
        pattern(
            r"(?:第|頁)\s*\d+(?:-\d+)?(?:\s*(?:頁|頁面))?",
            PatternKind::AcademicRef,
            "page reference",
        ),
        pattern(
            r"(?:章節|部分)\s*\d+(?:\.\d+)*(?:\s*(?:章|節|部分|條))?",
            PatternKind::AcademicRef,
            "chapter/section reference",
        ),
        pattern(
            r"\(\d{4}[a-z]?\)",
            PatternKind::AcademicRef,
            "citation year",
        ),
        pattern(
            r"[¹²³⁴⁵⁶⁷⁸⁹⁰]+",
            PatternKind::FootnoteMark,
            "superscript footnote",
        ),
        pattern(r"\d{4}年", PatternKind::Date, "CJK year"),
        pattern(r"\d{1,2}月\d{1,2}日", PatternKind::Date, "CJK month-day"),
        // Most general rule last: only claims text no earlier pattern took.
        pattern(
            r"\b\d{2,}\b",
            PatternKind::StandaloneNumber,
            "standalone multi-digit number",
        ),
    ]
});

fn pattern(re: &str, kind: PatternKind, description: &'static str) -> ProtectionPattern {
    ProtectionPattern {
        regex: Regex::new(re).expect("protection pattern must compile"),
        kind,
        description,
    }
}
