use cupom_core::ExtractionResult;
use serde::Serialize;

use crate::amount::Tier;

/// An [`ExtractionResult`] plus the tier that produced its value, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    #[serde(flatten)]
    pub result: ExtractionResult,
    pub tier: Option<Tier>,
}

impl Extraction {
    /// Whether a total was found at all.
    pub fn has_value(&self) -> bool {
        self.tier.is_some()
    }
}
