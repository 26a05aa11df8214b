//! Listing data structures.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel region for listings that could not be localized to one UF.
pub const NATIONWIDE: &str = "Nacional/Outro";

/// One raw announcement block as delivered by the upstream page.
///
/// Opaque HTML fragment; consumed once by the record builder.
#[derive(Debug, Clone)]
pub struct RawListingBlock {
    pub html: String,
}

impl RawListingBlock {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

/// Education level required by a listing, inferred from keyword presence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    Fundamental,
    Medio,
    Superior,
}

impl EducationLevel {
    /// Parse a user-supplied level name, tolerating case and accents.
    pub fn parse(s: &str) -> Option<Self> {
        match crate::extract::normalize(s).as_str() {
            "fundamental" => Some(Self::Fundamental),
            "medio" => Some(Self::Medio),
            "superior" => Some(Self::Superior),
            _ => None,
        }
    }
}

/// A processed announcement held in the cache.
///
/// `tokens` and `education_levels` are sets in memory and serialize as sorted
/// lists, so the on-disk snapshot stays portable and diff-friendly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    /// Original announcement text, diacritics preserved (display)
    pub text: String,

    /// Lowercase, diacritic-stripped copy (matching)
    pub normalized_text: String,

    /// Word set derived from the normalized text (exclusion lookup)
    pub tokens: BTreeSet<String>,

    /// Inferred education levels; empty when undetected
    pub education_levels: BTreeSet<EducationLevel>,

    /// Source URL of the listing; doubles as the record's de-duplication
    /// identity
    pub link: String,

    /// Highest plausible pay figure found; 0.0 means unstated
    pub salary: f64,

    /// Latest parseable date found, taken as the application-close date
    pub deadline: Option<NaiveDate>,

    /// Two-letter UF code, or [`NATIONWIDE`]
    pub region: String,
}

/// Caller-facing projection of a record that passed the filters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayRecord {
    /// Formatted salary ("R$ 1.234,56" or the unstated placeholder)
    pub salary: String,

    /// UF code or [`NATIONWIDE`]
    pub region: String,

    /// Deadline as dd/mm/yyyy, or the unknown placeholder
    pub deadline: String,

    /// Original announcement text
    pub text: String,

    /// Listing source URL
    pub link: String,
}
