use cupom_core::{decide, ExtractionResult, Money, ValidationDecision};

use crate::amount::ValueExtractor;
use crate::config::{ConfigError, ExtractionConfig};
use crate::lines;
use crate::store::StoreNameResolver;
use crate::types::Extraction;

// ── Public extraction API ─────────────────────────────────────────────────────

/// Turns OCR text into a store name, a total and a validation decision.
///
/// Holds only configuration compiled at construction, so one instance can be
/// shared behind an `Arc` by any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Extractor {
    store: StoreNameResolver,
    value: ValueExtractor,
    minimum: Money,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: StoreNameResolver::new(&config),
            value: ValueExtractor::new(&config)?,
            minimum: Money::from_decimal(config.minimum),
        })
    }

    pub fn minimum(&self) -> Money {
        self.minimum
    }

    /// Extract structured fields from raw OCR text.
    pub fn extract(&self, ocr_text: &str) -> ExtractionResult {
        self.extract_detailed(ocr_text).result
    }

    /// Like [`Extractor::extract`], also reporting which tier found the total.
    pub fn extract_detailed(&self, ocr_text: &str) -> Extraction {
        let lines = lines::normalize(ocr_text);
        let store_name = self.store.resolve(&lines);
        let found = self.value.extract_with_tier(&lines, ocr_text);

        Extraction {
            result: ExtractionResult::new(
                store_name,
                found.map(|(_, v)| Money::from_decimal(v)).unwrap_or_default(),
            ),
            tier: found.map(|(tier, _)| tier),
        }
    }

    pub fn decide(&self, result: &ExtractionResult) -> ValidationDecision {
        decide(result, self.minimum)
    }

    pub fn extract_and_decide(&self, ocr_text: &str) -> ValidationDecision {
        self.decide(&self.extract(ocr_text))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default()).expect("default extraction config is valid")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
