use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Brazilian real amount, held at two decimal places.
///
/// Serializes as a plain JSON number so clients receive `18.5`, not `"18.50"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// `R$ 22,90`: comma decimal separator, no thousands grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = format!("{:.2}", self.0);
        write!(f, "R$ {}", plain.replace('.', ","))
    }
}
