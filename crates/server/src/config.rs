//! Configuration management for the receipt validation server

use anyhow::{Context, Result};
use cupom_ocr::{ExtractionConfig, PreprocessOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    /// Optional TOML file overriding the extraction defaults.
    pub extraction_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub lang: String,
    pub data_path: Option<String>,
    pub timeout: Duration,
    pub preprocess: PreprocessOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_bytes: 10 * 1024 * 1024,
            },
            ocr: OcrConfig {
                lang: "por+eng".to_string(),
                data_path: None,
                timeout: Duration::from_secs(30),
                preprocess: PreprocessOptions::default(),
            },
            extraction_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or(&lookup, "SERVER_PORT", defaults.server.port)?,
                max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes)?,
            },
            ocr: OcrConfig {
                lang: lookup("OCR_LANG").unwrap_or(defaults.ocr.lang),
                data_path: lookup("TESSDATA_PREFIX"),
                timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "OCR_TIMEOUT_SECS",
                    defaults.ocr.timeout.as_secs(),
                )?),
                preprocess: PreprocessOptions {
                    target_width: parse_or(&lookup, "PREPROCESS_WIDTH", defaults.ocr.preprocess.target_width)?,
                    threshold: parse_or(&lookup, "PREPROCESS_THRESHOLD", defaults.ocr.preprocess.threshold)?,
                },
            },
            extraction_path: lookup("EXTRACTION_CONFIG").map(PathBuf::from),
        })
    }

    pub fn extraction(&self) -> Result<ExtractionConfig> {
        match &self.extraction_path {
            Some(path) => ExtractionConfig::from_toml_file(path)
                .with_context(|| format!("loading extraction config from {}", path.display())),
            None => Ok(ExtractionConfig::default()),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}
