//! Salary extraction from announcement text.

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::ExtractionConfig;

/// Extracts the highest plausible pay figure from free text.
pub struct SalaryExtractor {
    patterns: Vec<Regex>,
    min_plausible: f64,
}

impl SalaryExtractor {
    /// Compile the configured currency patterns.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let patterns = config
            .salary_patterns
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| AppError::config(format!("salary pattern '{p}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            min_plausible: config.min_plausible_salary,
        })
    }

    /// Scan `text` for currency amounts and return the maximum plausible one.
    ///
    /// Announcements usually quote a pay scale ("de R$ 2.000,00 a R$ 5.500,00");
    /// the ceiling is the figure worth ranking on. Amounts at or below the
    /// fee threshold are skipped (application fees, per-hour rates). Returns
    /// 0.0 when nothing plausible is found, meaning "unstated".
    pub fn extract(&self, text: &str) -> f64 {
        let mut best: f64 = 0.0;

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let Some(m) = caps.get(1) else { continue };
                let Some(value) = parse_brl_number(m.as_str()) else {
                    continue;
                };
                if value > self.min_plausible && value > best {
                    best = value;
                }
            }
        }

        best
    }
}

/// Parse a Brazilian-format numeral: thousands `.`, decimal `,`.
fn parse_brl_number(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('.', "").replace(',', ".");
    cleaned.parse().ok()
}
