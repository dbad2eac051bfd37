use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

/// Store name used when no line of the receipt header qualifies.
pub const PLACEHOLDER_STORE: &str = "Estabelecimento Comercial";

/// The two fields pulled out of a receipt's OCR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Never empty; falls back to [`PLACEHOLDER_STORE`].
    pub store_name: String,
    /// Zero when no total could be identified.
    pub value: Money,
}

impl ExtractionResult {
    pub fn new(store_name: impl Into<String>, value: Money) -> Self {
        Self { store_name: store_name.into(), value }
    }
}

/// Outcome of checking an extraction against the minimum spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationDecision {
    Approved { value: Money, store_name: String },
    BelowMinimum { value: Money, store_name: String },
    Unidentified { store_name: String },
}

/// Classify an extraction. Pure: the same inputs always give the same outcome.
pub fn decide(result: &ExtractionResult, minimum: Money) -> ValidationDecision {
    let store_name = result.store_name.clone();
    if result.value >= minimum {
        ValidationDecision::Approved { value: result.value, store_name }
    } else if !result.value.is_zero() {
        ValidationDecision::BelowMinimum { value: result.value, store_name }
    } else {
        ValidationDecision::Unidentified { store_name }
    }
}

impl ValidationDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, ValidationDecision::Approved { .. })
    }

    pub fn store_name(&self) -> &str {
        match self {
            ValidationDecision::Approved { store_name, .. }
            | ValidationDecision::BelowMinimum { store_name, .. }
            | ValidationDecision::Unidentified { store_name } => store_name,
        }
    }

    /// The identified value; zero for [`ValidationDecision::Unidentified`].
    pub fn value(&self) -> Money {
        match self {
            ValidationDecision::Approved { value, .. }
            | ValidationDecision::BelowMinimum { value, .. } => *value,
            ValidationDecision::Unidentified { .. } => Money::zero(),
        }
    }

    /// User-facing message (pt-BR) shown to the shopper.
    pub fn message(&self, minimum: Money) -> String {
        match self {
            ValidationDecision::Approved { .. } => "Nota fiscal validada com sucesso!".to_string(),
            ValidationDecision::BelowMinimum { value, .. } => {
                format!("Valor identificado ({value}) é inferior ao mínimo de {minimum}.")
            }
            ValidationDecision::Unidentified { .. } => {
                "Não foi possível identificar o valor total na nota fiscal. Tente uma foto mais nítida."
                    .to_string()
            }
        }
    }
}

impl fmt::Display for ValidationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationDecision::Approved { .. } => write!(f, "approved"),
            ValidationDecision::BelowMinimum { .. } => write!(f, "below_minimum"),
            ValidationDecision::Unidentified { .. } => write!(f, "unidentified"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn money(cents: i64) -> Money {
        Money::from_decimal(Decimal::new(cents, 2))
    }

    fn minimum() -> Money {
        money(1500)
    }

    #[test]
    fn value_at_minimum_is_approved() {
        let r = ExtractionResult::new("LOJA", money(1500));
        assert!(decide(&r, minimum()).is_approved());
    }

    #[test]
    fn value_above_minimum_is_approved() {
        let r = ExtractionResult::new("MERCADINHO BOM PRECO", money(1850));
        assert_eq!(
            decide(&r, minimum()),
            ValidationDecision::Approved { value: money(1850), store_name: "MERCADINHO BOM PRECO".into() }
        );
    }

    #[test]
    fn positive_value_under_minimum_is_below_minimum() {
        let r = ExtractionResult::new("LOJA XYZ", money(800));
        let d = decide(&r, minimum());
        assert_eq!(d, ValidationDecision::BelowMinimum { value: money(800), store_name: "LOJA XYZ".into() });
        assert_eq!(d.message(minimum()), "Valor identificado (R$ 8,00) é inferior ao mínimo de R$ 15,00.");
    }

    #[test]
    fn zero_value_is_unidentified_and_keeps_store() {
        let r = ExtractionResult::new(PLACEHOLDER_STORE, Money::zero());
        let d = decide(&r, minimum());
        assert_eq!(d, ValidationDecision::Unidentified { store_name: PLACEHOLDER_STORE.into() });
        assert_eq!(d.store_name(), PLACEHOLDER_STORE);
        assert!(d.value().is_zero());
        assert!(d.message(minimum()).starts_with("Não foi possível identificar"));
    }

    #[test]
    fn decide_does_not_alter_input() {
        let r = ExtractionResult::new("LOJA", money(2000));
        let before = r.clone();
        let _ = decide(&r, minimum());
        assert_eq!(r, before);
        assert_eq!(decide(&r, minimum()), decide(&r, minimum()));
    }

    #[test]
    fn display_names_outcome() {
        let r = ExtractionResult::new("LOJA", money(100));
        assert_eq!(decide(&r, minimum()).to_string(), "below_minimum");
    }
}
