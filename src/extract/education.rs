//! Education-level inference from announcement text.

use std::collections::BTreeSet;

use crate::models::{EducationKeywords, EducationLevel};

/// Infers which education levels a listing hires for.
///
/// Purely table-driven: each level owns a keyword family, and a family hit
/// tags the record with that level. Listings hiring across levels get several
/// tags; an empty set means the text gave no signal.
pub struct EducationClassifier {
    families: Vec<(EducationLevel, Vec<String>)>,
}

impl EducationClassifier {
    pub fn new(keywords: &EducationKeywords) -> Self {
        let families = vec![
            (EducationLevel::Fundamental, keywords.fundamental.clone()),
            (EducationLevel::Medio, keywords.medio.clone()),
            (EducationLevel::Superior, keywords.superior.clone()),
        ];
        Self { families }
    }

    /// Classify normalized text into the set of detected levels.
    pub fn classify(&self, normalized_text: &str) -> BTreeSet<EducationLevel> {
        self.families
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| normalized_text.contains(k)))
            .map(|(level, _)| *level)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> EducationClassifier {
        EducationClassifier::new(&EducationKeywords::default())
    }

    #[test]
    fn named_profession_implies_superior() {
        let levels = classifier().classify("vagas para medico e enfermeiro");
        assert!(levels.contains(&EducationLevel::Superior));
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn mixed_listing_gets_multiple_levels() {
        let levels =
            classifier().classify("cargos de nivel medio e nivel superior, ver edital");
        assert!(levels.contains(&EducationLevel::Medio));
        assert!(levels.contains(&EducationLevel::Superior));
    }

    #[test]
    fn operational_role_implies_fundamental() {
        let levels = classifier().classify("contratacao de gari e zelador");
        assert_eq!(
            levels.into_iter().collect::<Vec<_>>(),
            vec![EducationLevel::Fundamental]
        );
    }

    #[test]
    fn no_signal_means_empty() {
        assert!(classifier().classify("concurso publico 2024").is_empty());
    }
}
