//! Filtering and ranking of cached records.

use crate::extract::normalize;
use crate::models::{DisplayRecord, FilterCriteria, ListingRecord, NationwidePolicy, NATIONWIDE};
use crate::utils::format::{format_brl, format_deadline};

/// Apply `criteria` to `records` and project the survivors for display.
///
/// Predicates short-circuit in a fixed order: exclusion keywords, salary
/// floor, region, inclusion keywords, education level. Records arrive from
/// the cache already ranked salary-descending and leave in the same order;
/// no re-sort here.
pub fn filter(records: &[ListingRecord], criteria: &FilterCriteria) -> Vec<DisplayRecord> {
    let exclude: Vec<String> = criteria
        .exclude_keywords
        .iter()
        .map(|k| normalize(k))
        .collect();
    let include: Vec<String> = criteria
        .include_keywords
        .iter()
        .map(|k| normalize(k))
        .collect();

    records
        .iter()
        .filter(|record| passes(record, criteria, &exclude, &include))
        .map(project)
        .collect()
}

fn passes(
    record: &ListingRecord,
    criteria: &FilterCriteria,
    exclude: &[String],
    include: &[String],
) -> bool {
    // 1. Exclusion beats everything, including a matching include keyword
    if exclude.iter().any(|k| record.tokens.contains(k)) {
        return false;
    }

    // 2. A positive floor also rejects unstated (0.0) salaries
    if criteria.min_salary > 0.0 && record.salary < criteria.min_salary {
        return false;
    }

    // 3. Region, with a raw-substring fallback for codes mentioned in text
    //    but not detected as the primary UF
    if !criteria.target_regions.is_empty() && !region_passes(record, criteria) {
        return false;
    }

    // 4. Inclusion keywords are OR semantics
    if !include.is_empty()
        && !include
            .iter()
            .any(|k| record.normalized_text.contains(k.as_str()))
    {
        return false;
    }

    // 5. Education level
    if !criteria.target_education_levels.is_empty()
        && !record
            .education_levels
            .iter()
            .any(|level| criteria.target_education_levels.contains(level))
    {
        return false;
    }

    true
}

fn region_passes(record: &ListingRecord, criteria: &FilterCriteria) -> bool {
    if criteria.target_regions.contains(&record.region) {
        return true;
    }
    if record.region == NATIONWIDE
        && criteria.nationwide_policy == NationwidePolicy::MatchAny
    {
        return true;
    }
    criteria
        .target_regions
        .iter()
        .any(|code| record.text.contains(code.as_str()))
}

fn project(record: &ListingRecord) -> DisplayRecord {
    DisplayRecord {
        salary: format_brl(record.salary),
        region: record.region.clone(),
        deadline: format_deadline(record.deadline),
        text: record.text.clone(),
        link: record.link.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::extract::tokenize;
    use crate::models::EducationLevel;
    use crate::utils::format::UNSTATED_SALARY;

    fn record(text: &str, salary: f64, region: &str) -> ListingRecord {
        let normalized_text = normalize(text);
        let tokens = tokenize(&normalized_text);
        ListingRecord {
            text: text.to_string(),
            normalized_text,
            tokens,
            education_levels: BTreeSet::new(),
            link: format!("https://example.com/{region}/{salary}"),
            salary,
            deadline: NaiveDate::from_ymd_opt(2099, 12, 31),
            region: region.to_string(),
        }
    }

    fn with_levels(mut r: ListingRecord, levels: &[EducationLevel]) -> ListingRecord {
        r.education_levels = levels.iter().copied().collect();
        r
    }

    #[test]
    fn no_criteria_passes_everything_in_order() {
        let records = vec![
            record("Concurso A", 9000.0, "SP"),
            record("Concurso B", 2000.0, "RJ"),
        ];
        let out = filter(&records, &FilterCriteria::new());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "Concurso A");
        assert_eq!(out[1].text, "Concurso B");
    }

    #[test]
    fn salary_floor_rejects_below_and_unstated() {
        let records = vec![
            record("rico", 8000.0, "SP"),
            record("pobre", 1200.0, "SP"),
            record("sem valor", 0.0, "SP"),
        ];
        let criteria = FilterCriteria {
            min_salary: 5000.0,
            ..FilterCriteria::new()
        };
        let out = filter(&records, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "rico");
    }

    #[test]
    fn zero_floor_keeps_unstated() {
        let records = vec![record("sem valor", 0.0, "SP")];
        let out = filter(&records, &FilterCriteria::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].salary, UNSTATED_SALARY);
    }

    #[test]
    fn exclusion_wins_over_inclusion() {
        let records = vec![record("Concurso para Médico Veterinário", 7000.0, "SP")];
        let criteria = FilterCriteria {
            include_keywords: vec!["veterinário".into()],
            exclude_keywords: vec!["médico".into()],
            ..FilterCriteria::new()
        };
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn exclusion_is_accent_insensitive_both_ways() {
        let records = vec![record("Vagas: Médico plantonista", 7000.0, "SP")];
        let criteria = FilterCriteria {
            exclude_keywords: vec!["medico".into()],
            ..FilterCriteria::new()
        };
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn include_is_or_semantics() {
        let records = vec![
            record("vagas de enfermeiro", 3000.0, "SP"),
            record("vagas de professor", 3000.0, "SP"),
            record("vagas de gari", 1500.0, "SP"),
        ];
        let criteria = FilterCriteria {
            include_keywords: vec!["enfermeiro".into(), "professor".into()],
            ..FilterCriteria::new()
        };
        assert_eq!(filter(&records, &criteria).len(), 2);
    }

    #[test]
    fn region_filter_selects_target() {
        let records = vec![
            record("concurso paulista", 3000.0, "SP"),
            record("concurso carioca", 3000.0, "RJ"),
        ];
        let criteria = FilterCriteria {
            target_regions: ["SP".to_string()].into_iter().collect(),
            ..FilterCriteria::new()
        };
        let out = filter(&records, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].region, "SP");
    }

    #[test]
    fn region_substring_fallback() {
        // Detected as RJ, but SP is mentioned in the text
        let records = vec![record("RJ e também polo em SP", 3000.0, "RJ")];
        let criteria = FilterCriteria {
            target_regions: ["SP".to_string()].into_iter().collect(),
            ..FilterCriteria::new()
        };
        assert_eq!(filter(&records, &criteria).len(), 1);
    }

    #[test]
    fn nationwide_passes_by_default_policy() {
        let records = vec![record("concurso federal", 3000.0, NATIONWIDE)];
        let criteria = FilterCriteria {
            target_regions: ["AC".to_string()].into_iter().collect(),
            ..FilterCriteria::new()
        };
        assert_eq!(filter(&records, &criteria).len(), 1);
    }

    #[test]
    fn nationwide_explicit_only_policy() {
        let records = vec![record("concurso federal", 3000.0, NATIONWIDE)];

        let unselected = FilterCriteria {
            target_regions: ["AC".to_string()].into_iter().collect(),
            nationwide_policy: NationwidePolicy::ExplicitOnly,
            ..FilterCriteria::new()
        };
        assert!(filter(&records, &unselected).is_empty());

        let selected = FilterCriteria {
            target_regions: [NATIONWIDE.to_string()].into_iter().collect(),
            nationwide_policy: NationwidePolicy::ExplicitOnly,
            ..FilterCriteria::new()
        };
        assert_eq!(filter(&records, &selected).len(), 1);
    }

    #[test]
    fn education_filter_intersects() {
        let records = vec![
            with_levels(record("vagas tecnico", 2000.0, "SP"), &[EducationLevel::Medio]),
            with_levels(
                record("vagas medico", 9000.0, "SP"),
                &[EducationLevel::Superior],
            ),
            record("nada detectado", 2000.0, "SP"),
        ];
        let criteria = FilterCriteria {
            target_education_levels: [EducationLevel::Superior].into_iter().collect(),
            ..FilterCriteria::new()
        };
        let out = filter(&records, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "vagas medico");
    }

    #[test]
    fn projection_formats_fields() {
        let records = vec![record("Concurso X", 1234.56, "SP")];
        let out = filter(&records, &FilterCriteria::new());
        assert_eq!(out[0].salary, "R$ 1.234,56");
        assert_eq!(out[0].deadline, "31/12/2099");
        assert_eq!(out[0].link, records[0].link);
    }
}
