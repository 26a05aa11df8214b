//! UF (federative unit) detection from announcement text.

use regex::Regex;

use crate::error::{AppError, Result};
use crate::extract::normalize;
use crate::models::{ExtractionConfig, NATIONWIDE};

/// Detects the UF a listing belongs to.
pub struct RegionExtractor {
    /// Word-boundary alternation over the 27 uppercase codes
    code_pattern: Regex,
    /// (boundary-matched name pattern, code), longest names first
    name_patterns: Vec<(Regex, String)>,
}

impl RegionExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let alternation = config.uf_codes.join("|");
        let code_pattern = Regex::new(&format!(r"\b({alternation})\b"))
            .map_err(|e| AppError::config(format!("uf code pattern: {e}")))?;

        // Longest first, so "mato grosso do sul" wins over "mato grosso"
        let mut names = config.state_names.clone();
        names.sort_by_key(|s| std::cmp::Reverse(s.name.len()));

        let name_patterns = names
            .into_iter()
            .map(|s| {
                let escaped = regex::escape(&s.name);
                Regex::new(&format!(r"\b{escaped}\b"))
                    .map(|re| (re, s.code))
                    .map_err(|e| AppError::config(format!("state name '{}': {e}", s.name)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            code_pattern,
            name_patterns,
        })
    }

    /// Detect the UF mentioned in `text`.
    ///
    /// Uppercase two-letter codes are tried first on the original text; the
    /// word boundary keeps "BA" from matching inside "CUIABA". When no code
    /// appears, full state names are searched in the normalized text. Neither
    /// hit means the listing is nationwide or could not be localized.
    pub fn extract(&self, text: &str) -> String {
        if let Some(m) = self.code_pattern.find(text) {
            return m.as_str().to_string();
        }

        let normalized = normalize(text);
        for (pattern, code) in &self.name_patterns {
            if pattern.is_match(&normalized) {
                return code.clone();
            }
        }

        NATIONWIDE.to_string()
    }
}
