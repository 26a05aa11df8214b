//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP fetching behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Cache staleness policy settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Field extraction tables and thresholds
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Deep-link resolution tables
    #[serde(default)]
    pub links: LinksConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.url.trim().is_empty() {
            return Err(AppError::validation("fetcher.url is empty"));
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.block_selectors.is_empty() {
            return Err(AppError::validation("fetcher.block_selectors is empty"));
        }
        if self.cache.timeout_secs == 0 {
            return Err(AppError::validation("cache.timeout_secs must be > 0"));
        }
        if self.extraction.salary_patterns.is_empty() {
            return Err(AppError::validation("extraction.salary_patterns is empty"));
        }
        for pattern in &self.extraction.salary_patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(AppError::validation(format!(
                    "invalid salary pattern '{pattern}': {e}"
                )));
            }
        }
        if self.extraction.uf_codes.is_empty() {
            return Err(AppError::validation("extraction.uf_codes is empty"));
        }
        if self.extraction.min_text_len == 0 {
            return Err(AppError::validation("extraction.min_text_len must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and upstream fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Aggregator page listing open concursos
    #[serde(default = "defaults::url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// CSS class markers identifying one listing block each
    #[serde(default = "defaults::block_selectors")]
    pub block_selectors: Vec<String>,

    /// Broad selector tried when the primary markers match nothing
    #[serde(default = "defaults::fallback_selector")]
    pub fallback_selector: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            block_selectors: defaults::block_selectors(),
            fallback_selector: defaults::fallback_selector(),
        }
    }
}

/// Cache staleness policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Snapshot age in seconds before a refresh is attempted
    #[serde(default = "defaults::cache_timeout")]
    pub timeout_secs: u64,

    /// File name of the persisted snapshot inside the storage directory
    #[serde(default = "defaults::snapshot_file")]
    pub snapshot_file: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::cache_timeout(),
            snapshot_file: defaults::snapshot_file(),
        }
    }
}

/// Field extraction tables and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Currency patterns scanned for salary candidates (capture group 1 = amount)
    #[serde(default = "defaults::salary_patterns")]
    pub salary_patterns: Vec<String>,

    /// Amounts at or below this value are treated as fees, not salaries
    #[serde(default = "defaults::min_plausible_salary")]
    pub min_plausible_salary: f64,

    /// Blocks with less visible text than this are decorative, not listings
    #[serde(default = "defaults::min_text_len")]
    pub min_text_len: usize,

    /// The 27 federative unit codes
    #[serde(default = "defaults::uf_codes")]
    pub uf_codes: Vec<String>,

    /// Full state names (normalized) mapped to their UF code
    #[serde(default = "defaults::state_names")]
    pub state_names: Vec<StateName>,

    /// Keyword families inferring required education level
    #[serde(default)]
    pub education: EducationKeywords,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            salary_patterns: defaults::salary_patterns(),
            min_plausible_salary: defaults::min_plausible_salary(),
            min_text_len: defaults::min_text_len(),
            uf_codes: defaults::uf_codes(),
            state_names: defaults::state_names(),
            education: EducationKeywords::default(),
        }
    }
}

/// A normalized state name and its two-letter code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateName {
    pub name: String,
    pub code: String,
}

/// Keyword families for education-level inference.
///
/// Keywords are stored normalized (lowercase, no diacritics) and matched as
/// substrings of the record's normalized text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationKeywords {
    #[serde(default = "defaults::fundamental_keywords")]
    pub fundamental: Vec<String>,

    #[serde(default = "defaults::medio_keywords")]
    pub medio: Vec<String>,

    #[serde(default = "defaults::superior_keywords")]
    pub superior: Vec<String>,
}

impl Default for EducationKeywords {
    fn default() -> Self {
        Self {
            fundamental: defaults::fundamental_keywords(),
            medio: defaults::medio_keywords(),
            superior: defaults::superior_keywords(),
        }
    }
}

/// Deep-link resolution tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Exam-board name fragments recognized in inscription links
    #[serde(default = "defaults::bancas")]
    pub bancas: Vec<String>,

    /// Anchor-text terms that strongly indicate an inscription page
    #[serde(default = "defaults::inscription_terms")]
    pub inscription_terms: Vec<String>,

    /// Anchor-text terms that indicate the edital document
    #[serde(default = "defaults::edital_terms")]
    pub edital_terms: Vec<String>,

    /// Domains never accepted as a resolved link (social media, the aggregator itself)
    #[serde(default = "defaults::excluded_domains")]
    pub excluded_domains: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            bancas: defaults::bancas(),
            inscription_terms: defaults::inscription_terms(),
            edital_terms: defaults::edital_terms(),
            excluded_domains: defaults::excluded_domains(),
        }
    }
}

mod defaults {
    use super::StateName;

    // Fetcher defaults
    pub fn url() -> String {
        "https://www.pciconcursos.com.br/concursos/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn block_selectors() -> Vec<String> {
        vec!["div.ca".into(), "div.na".into()]
    }
    pub fn fallback_selector() -> String {
        "div[class]".into()
    }

    // Cache defaults
    pub fn cache_timeout() -> u64 {
        3600
    }
    pub fn snapshot_file() -> String {
        "concursos.json".into()
    }

    // Extraction defaults
    pub fn salary_patterns() -> Vec<String> {
        vec![
            // R$ 1.234,56 / R$ 1234 / R$ 1500,00
            r"(?i)R\$\s*(\d+(?:\.\d{3})*(?:,\d{1,2})?)".into(),
            // bare amount qualified as pay: "5.500,00 bruto"
            r"(?i)(\d+(?:\.\d{3})*,\d{2})\s*(?:reais|bruto|l[ií]quido)".into(),
        ]
    }
    pub fn min_plausible_salary() -> f64 {
        400.0
    }
    pub fn min_text_len() -> usize {
        15
    }
    pub fn uf_codes() -> Vec<String> {
        [
            "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA",
            "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
    pub fn state_names() -> Vec<StateName> {
        [
            ("mato grosso do sul", "MS"),
            ("rio grande do norte", "RN"),
            ("rio grande do sul", "RS"),
            ("distrito federal", "DF"),
            ("espirito santo", "ES"),
            ("rio de janeiro", "RJ"),
            ("santa catarina", "SC"),
            ("minas gerais", "MG"),
            ("mato grosso", "MT"),
            ("pernambuco", "PE"),
            ("sao paulo", "SP"),
            ("tocantins", "TO"),
            ("amazonas", "AM"),
            ("maranhao", "MA"),
            ("rondonia", "RO"),
            ("alagoas", "AL"),
            ("paraiba", "PB"),
            ("roraima", "RR"),
            ("sergipe", "SE"),
            ("parana", "PR"),
            ("bahia", "BA"),
            ("goias", "GO"),
            ("amapa", "AP"),
            ("ceara", "CE"),
            ("piaui", "PI"),
            ("acre", "AC"),
            ("para", "PA"),
        ]
        .iter()
        .map(|(name, code)| StateName {
            name: name.to_string(),
            code: code.to_string(),
        })
        .collect()
    }

    pub fn fundamental_keywords() -> Vec<String> {
        [
            "ensino fundamental",
            "nivel fundamental",
            "alfabetizado",
            "servicos gerais",
            "auxiliar de servicos",
            "gari",
            "merendeira",
            "zelador",
            "vigia",
            "coveiro",
            "motorista",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
    pub fn medio_keywords() -> Vec<String> {
        [
            "ensino medio",
            "nivel medio",
            "tecnico",
            "assistente administrativo",
            "auxiliar administrativo",
            "recepcionista",
            "agente administrativo",
            "agente comunitario",
            "fiscal",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
    pub fn superior_keywords() -> Vec<String> {
        [
            "nivel superior",
            "ensino superior",
            "graduacao",
            "medico",
            "enfermeiro",
            "engenheiro",
            "advogado",
            "analista",
            "professor",
            "farmaceutico",
            "psicologo",
            "fonoaudiologo",
            "fisioterapeuta",
            "nutricionista",
            "contador",
            "procurador",
            "auditor",
            "juiz",
            "promotor",
            "defensor",
            "dentista",
            "odontologo",
            "veterinario",
            "arquiteto",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    // Link resolution defaults
    pub fn bancas() -> Vec<String> {
        [
            "aocp", "avalia", "cebraspe", "cespe", "cesgranrio", "ceperj", "cetap", "cetro",
            "ciee", "comperve", "consulplan", "consulpam", "consesp", "copese", "copeve",
            "covest", "exatus", "fadesp", "faepesul", "fafipa", "fapec", "faurgs", "fcc",
            "fepese", "fgv", "fumarc", "fundatec", "fundep", "funrio", "fuvest", "ibade",
            "ibam", "ibfc", "idecan", "idib", "ieses", "imparh", "incp", "inep", "institutomais",
            "iobv", "klc", "legalle", "makiyama", "msconcursos", "nc.ufpr", "nce", "nossorumo",
            "objetiva", "omni", "quadrix", "rbo", "selecon", "shdias", "uece", "uel", "uem",
            "uepb", "uerj", "ufac", "ufam", "ufba", "ufcg", "uff", "ufgd", "ufla", "ufma",
            "ufmg", "ufmt", "ufpa", "ufpe", "ufpel", "ufpr", "ufrgs", "ufrj", "ufrn", "ufsc",
            "ufscar", "ufsm", "ufv", "unesp", "unicamp", "unicentro", "unioeste", "unirio",
            "univali", "upe", "usp", "utfpr", "vunesp", "zambini",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
    pub fn inscription_terms() -> Vec<String> {
        [
            "inscriç",
            "inscreva",
            "ficha",
            "candidato",
            "eletrônico",
            "formulário",
            "site",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
    pub fn edital_terms() -> Vec<String> {
        ["edital", "abertura"].iter().map(|s| s.to_string()).collect()
    }
    pub fn excluded_domains() -> Vec<String> {
        ["pciconcursos", "facebook", "twitter", "instagram", "whatsapp"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.fetcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_cache_timeout() {
        let mut config = Config::default();
        config.cache.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_salary_pattern() {
        let mut config = Config::default();
        config.extraction.salary_patterns = vec!["([unclosed".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_tables_are_populated() {
        let config = Config::default();
        assert_eq!(config.extraction.uf_codes.len(), 27);
        assert_eq!(config.extraction.state_names.len(), 27);
        assert!(!config.links.bancas.is_empty());
    }
}
