//! Keyword-based clause detection.
//!
//! A clause is "present" when any of its keywords occurs in the text as a
//! case-insensitive substring. Both sides are lower-cased and whitespace runs
//! are collapsed first, so line wrapping in the PDF does not hide a phrase.

use std::sync::LazyLock;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseCategory {
    Termination,
    Confidentiality,
    Indemnity,
    PaymentTerms,
    DisputeResolution,
    Liability,
    ForceMajeure,
    GoverningLaw,
    NonCompete,
    IntellectualProperty,
}

impl ClauseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Termination => "Termination",
            Self::Confidentiality => "Confidentiality",
            Self::Indemnity => "Indemnity",
            Self::PaymentTerms => "Payment terms",
            Self::DisputeResolution => "Dispute resolution / arbitration",
            Self::Liability => "Liability",
            Self::ForceMajeure => "Force majeure",
            Self::GoverningLaw => "Governing law / jurisdiction",
            Self::NonCompete => "Non-compete / non-solicitation",
            Self::IntellectualProperty => "Intellectual property",
        }
    }
}

/// Built-in category → keyword mapping, in reporting order.
const BUILTIN_KEYWORDS: &[(ClauseCategory, &[&str])] = &[
    (
        ClauseCategory::Termination,
        &["terminate", "termination", "notice period", "expiry of this agreement"],
    ),
    (
        ClauseCategory::Confidentiality,
        &["confidential", "non-disclosure", "proprietary information", "trade secret"],
    ),
    (
        ClauseCategory::Indemnity,
        &["indemnify", "indemnity", "indemnification", "hold harmless"],
    ),
    (
        ClauseCategory::PaymentTerms,
        &["payment", "invoice", "payable", "remuneration", "late fee"],
    ),
    (
        ClauseCategory::DisputeResolution,
        &["arbitration", "arbitrator", "dispute resolution", "mediation", "conciliation"],
    ),
    (
        ClauseCategory::Liability,
        &["liability", "liable", "consequential damages"],
    ),
    (
        ClauseCategory::ForceMajeure,
        &["force majeure", "act of god", "beyond the reasonable control"],
    ),
    (
        ClauseCategory::GoverningLaw,
        &["governing law", "governed by the laws", "exclusive jurisdiction", "jurisdiction of the courts"],
    ),
    (
        ClauseCategory::NonCompete,
        &["non-compete", "non compete", "restraint of trade", "non-solicitation"],
    ),
    (
        ClauseCategory::IntellectualProperty,
        &["intellectual property", "copyright", "trademark", "patent"],
    ),
];

static BUILTIN: LazyLock<ClauseTable> = LazyLock::new(|| {
    ClauseTable::new(
        BUILTIN_KEYWORDS
            .iter()
            .map(|(category, keywords)| (*category, keywords.iter().map(|k| k.to_string()).collect())),
    )
});

/// Presence of one clause category in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseMatch {
    pub category: ClauseCategory,
    pub present: bool,
    /// Keywords that hit, in table order.
    pub matched_keywords: Vec<String>,
}

impl ClauseMatch {
    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

/// Ordered, read-only mapping of clause category to keyword set.
#[derive(Debug, Clone)]
pub struct ClauseTable {
    entries: Vec<(ClauseCategory, Vec<String>)>,
}

impl ClauseTable {
    pub fn new(entries: impl IntoIterator<Item = (ClauseCategory, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(category, keywords)| {
                let keywords = keywords
                    .iter()
                    .map(|k| normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect();
                (category, keywords)
            })
            .collect();
        Self { entries }
    }

    /// The table loaded at process start.
    pub fn builtin() -> &'static ClauseTable {
        &BUILTIN
    }

    pub fn categories(&self) -> impl Iterator<Item = ClauseCategory> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    /// Every category with its presence flag.
    pub fn scan(&self, text: &str) -> Vec<ClauseMatch> {
        let haystack = normalize(text);
        self.entries
            .iter()
            .map(|(category, keywords)| {
                let matched_keywords: Vec<String> = if haystack.is_empty() {
                    Vec::new()
                } else {
                    keywords
                        .iter()
                        .filter(|k| haystack.contains(k.as_str()))
                        .cloned()
                        .collect()
                };
                ClauseMatch {
                    category: *category,
                    present: !matched_keywords.is_empty(),
                    matched_keywords,
                }
            })
            .collect()
    }

    /// Only the categories that are present.
    pub fn detect(&self, text: &str) -> Vec<ClauseMatch> {
        self.scan(text).into_iter().filter(|m| m.present).collect()
    }
}

/// Detect clauses with the built-in table.
pub fn detect_clauses(text: &str) -> Vec<ClauseMatch> {
    ClauseTable::builtin().detect(text)
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
