use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use cupom_core::PLACEHOLDER_STORE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid total pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Invalid extraction config: {0}")]
    Invalid(String),
}

/// Tunables for the extraction engine. Every field is optional in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum spend for approval.
    pub minimum: Decimal,
    pub placeholder_store: String,
    /// How many leading lines are searched for the store name.
    pub store_scan_window: usize,
    /// Case-insensitive substrings marking fiscal boilerplate lines.
    pub header_blacklist: Vec<String>,
    /// Keywords anchoring a labelled total.
    pub total_keywords: Vec<String>,
    /// Characters of noise tolerated between a keyword and its amount.
    pub keyword_noise_chars: usize,
    /// Exclusive upper bound for keyword and currency-marked amounts.
    pub value_ceiling: Decimal,
    /// Exclusive upper bound for bare decimals.
    pub fallback_ceiling: Decimal,
    /// Whole-number amounts in this range are treated as printed years.
    pub year_guard_min: u32,
    pub year_guard_max: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            minimum: Decimal::new(1500, 2),
            placeholder_store: PLACEHOLDER_STORE.to_string(),
            store_scan_window: 15,
            header_blacklist: [
                "DANFE",
                "NFC-E",
                "DOCUMENTO AUXILIAR",
                "NOTA FISCAL",
                "CNPJ",
                "IE",
                "ENDERECO",
                "RUA",
                "AV",
                "MONITOR",
                "PAGINA",
                "CUPOM",
                "EXTRATO",
                "BR",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            total_keywords: ["TOTAL", "VALOR", "PAGAR", "SUBTOTAL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            keyword_noise_chars: 20,
            value_ceiling: Decimal::from(10_000),
            fallback_ceiling: Decimal::from(5_000),
            // TODO: derive the guard from the current year instead of a fixed window.
            year_guard_min: 2023,
            year_guard_max: 2030,
        }
    }
}

impl ExtractionConfig {
    pub fn from_toml_str(toml_content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("total_keywords must not be empty".into()));
        }
        if self.year_guard_min > self.year_guard_max {
            return Err(ConfigError::Invalid(format!(
                "year_guard_min ({}) is greater than year_guard_max ({})",
                self.year_guard_min, self.year_guard_max
            )));
        }
        if self.value_ceiling <= Decimal::ZERO || self.fallback_ceiling <= Decimal::ZERO {
            return Err(ConfigError::Invalid("ceilings must be positive".into()));
        }
        if self.minimum < Decimal::ZERO {
            return Err(ConfigError::Invalid("minimum must not be negative".into()));
        }
        if self.store_scan_window == 0 {
            return Err(ConfigError::Invalid("store_scan_window must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_matches_receipt_conventions() {
        let c = ExtractionConfig::default();
        assert_eq!(c.minimum, Decimal::new(1500, 2));
        assert_eq!(c.placeholder_store, "Estabelecimento Comercial");
        assert_eq!(c.store_scan_window, 15);
        assert_eq!(c.header_blacklist.len(), 14);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ExtractionConfig::from_toml_str("minimum = \"20.00\"\nkeyword_noise_chars = 30\n").unwrap();
        assert_eq!(c.minimum, Decimal::new(2000, 2));
        assert_eq!(c.keyword_noise_chars, 30);
        assert_eq!(c.store_scan_window, 15);
        assert_eq!(c.total_keywords, ExtractionConfig::default().total_keywords);
    }

    #[test]
    fn rejects_inverted_year_guard() {
        let err = ExtractionConfig::from_toml_str("year_guard_min = 2030\nyear_guard_max = 2023\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_empty_keywords() {
        let err = ExtractionConfig::from_toml_str("total_keywords = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ExtractionConfig::from_toml_str("minimum = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store_scan_window = 5").unwrap();
        writeln!(file, "placeholder_store = \"Loja\"").unwrap();
        let c = ExtractionConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(c.store_scan_window, 5);
        assert_eq!(c.placeholder_store, "Loja");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ExtractionConfig::from_toml_file(Path::new("/nonexistent/cupom.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
