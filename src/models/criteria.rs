//! Filter criteria supplied by the caller, one instance per query.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::extract::normalize;
use crate::models::listing::{EducationLevel, NATIONWIDE};

/// How records tagged [`NATIONWIDE`] behave under a region filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NationwidePolicy {
    /// A nationwide record passes any region filter (it could match anywhere).
    #[default]
    MatchAny,
    /// A nationwide record passes only when the sentinel itself is selected.
    ExplicitOnly,
}

/// Caller-supplied filter criteria. Absent fields mean "no filter on this
/// dimension": zero floor, empty keyword lists, empty region/education sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Minimum salary; 0.0 disables the floor
    #[serde(default)]
    pub min_salary: f64,

    /// At least one must appear in the record text (OR semantics)
    #[serde(default)]
    pub include_keywords: Vec<String>,

    /// None may appear among the record's tokens
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// UF codes (and possibly the nationwide sentinel) to accept
    #[serde(default)]
    pub target_regions: HashSet<String>,

    /// Education levels to accept
    #[serde(default)]
    pub target_education_levels: BTreeSet<EducationLevel>,

    /// Sentinel-region behavior under a region filter
    #[serde(default)]
    pub nationwide_policy: NationwidePolicy,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a user-supplied money string leniently.
    ///
    /// Accepts "R$ 2.500,00", "2500", "2.500" and similar; anything
    /// unparseable yields 0.0 (no floor) rather than an error.
    pub fn parse_money(raw: &str) -> f64 {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == ',')
            .collect();
        cleaned.replace(',', ".").parse().unwrap_or(0.0)
    }

    /// Split a comma-separated term list, dropping blanks.
    pub fn split_terms(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Add the UF codes of a macro-region group ("Norte", "Sudeste", ...) to
    /// the target set. "Nacional" adds the sentinel. Unknown names are ignored.
    pub fn add_region_group(&mut self, group: &str) {
        match normalize(group).as_str() {
            "nacional" => {
                self.target_regions.insert(NATIONWIDE.to_string());
            }
            name => {
                if let Some(codes) = region_group(name) {
                    self.target_regions
                        .extend(codes.iter().map(|c| c.to_string()));
                }
            }
        }
    }
}

/// UF codes of one macro-region, looked up by normalized name.
fn region_group(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "norte" => Some(&["AM", "RR", "AP", "PA", "TO", "RO", "AC"]),
        "nordeste" => Some(&["MA", "PI", "CE", "RN", "PE", "PB", "SE", "AL", "BA"]),
        "centro-oeste" => Some(&["MT", "MS", "GO", "DF"]),
        "sudeste" => Some(&["SP", "RJ", "ES", "MG"]),
        "sul" => Some(&["PR", "RS", "SC"]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_handles_brl_format() {
        assert_eq!(FilterCriteria::parse_money("R$ 2.500,00"), 2500.0);
        assert_eq!(FilterCriteria::parse_money("12000"), 12000.0);
        assert_eq!(FilterCriteria::parse_money("1.500"), 1500.0);
    }

    #[test]
    fn parse_money_garbage_means_no_floor() {
        assert_eq!(FilterCriteria::parse_money(""), 0.0);
        assert_eq!(FilterCriteria::parse_money("a consultar"), 0.0);
    }

    #[test]
    fn split_terms_drops_blanks() {
        assert_eq!(
            FilterCriteria::split_terms("médico, , enfermeiro ,"),
            vec!["médico".to_string(), "enfermeiro".to_string()]
        );
    }

    #[test]
    fn region_group_expansion() {
        let mut criteria = FilterCriteria::new();
        criteria.add_region_group("Sul");
        assert!(criteria.target_regions.contains("PR"));
        assert!(criteria.target_regions.contains("RS"));
        assert!(criteria.target_regions.contains("SC"));
        assert_eq!(criteria.target_regions.len(), 3);
    }

    #[test]
    fn nacional_group_adds_sentinel() {
        let mut criteria = FilterCriteria::new();
        criteria.add_region_group("Nacional");
        assert!(criteria.target_regions.contains(NATIONWIDE));
    }

    #[test]
    fn unknown_group_is_ignored() {
        let mut criteria = FilterCriteria::new();
        criteria.add_region_group("Atlantida");
        assert!(criteria.target_regions.is_empty());
    }
}
