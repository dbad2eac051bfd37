use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{ConfigError, ExtractionConfig};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_currency_amount, r"(?i)R\$\s*([0-9]+[.,][0-9]{2})");
re!(re_bare_amount, r"([0-9]{2,}[.,][0-9]{2})");

/// Strategy that produced a total, highest confidence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// `TOTAL`/`VALOR`/... followed by an amount on the same line.
    KeywordTotal,
    /// `R$` immediately before an amount anywhere in the text.
    CurrencyMarked,
    /// Any `dd,dd` token, minus likely years.
    BareDecimal,
}

impl Tier {
    pub const CASCADE: [Tier; 3] = [Tier::KeywordTotal, Tier::CurrencyMarked, Tier::BareDecimal];
}

/// Picks the most likely receipt total with a three-tier fallback cascade.
///
/// Every tier resolves to the largest candidate under its ceiling, which favours
/// the grand total over line items while rejecting garbled huge numbers.
#[derive(Debug, Clone)]
pub struct ValueExtractor {
    keyword_total: Regex,
    value_ceiling: Decimal,
    fallback_ceiling: Decimal,
    year_guard: RangeInclusive<Decimal>,
}

impl ValueExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let keywords = config
            .total_keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(
            r"(?i)(?:{keywords})(?s:.){{0,{}}}?(?:R\$)?\s*([0-9]+[.,][0-9]{{2}})",
            config.keyword_noise_chars
        );
        Ok(Self {
            keyword_total: Regex::new(&pattern)?,
            value_ceiling: config.value_ceiling,
            fallback_ceiling: config.fallback_ceiling,
            year_guard: Decimal::from(config.year_guard_min)..=Decimal::from(config.year_guard_max),
        })
    }

    /// Best total, or zero when no tier finds one.
    pub fn extract(&self, lines: &[&str], raw: &str) -> Decimal {
        self.extract_with_tier(lines, raw)
            .map(|(_, value)| value)
            .unwrap_or(Decimal::ZERO)
    }

    /// Runs the tiers in order and stops at the first that yields a non-zero value.
    pub fn extract_with_tier(&self, lines: &[&str], raw: &str) -> Option<(Tier, Decimal)> {
        Tier::CASCADE
            .iter()
            .find_map(|&tier| self.run_tier(tier, lines, raw).map(|v| (tier, v)))
    }

    fn run_tier(&self, tier: Tier, lines: &[&str], raw: &str) -> Option<Decimal> {
        match tier {
            Tier::KeywordTotal => self.keyword_total(lines),
            Tier::CurrencyMarked => self.currency_marked(raw),
            Tier::BareDecimal => self.bare_decimal(raw),
        }
    }

    // Only the first keyword match on each line counts.
    fn keyword_total(&self, lines: &[&str]) -> Option<Decimal> {
        lines
            .iter()
            .filter_map(|l| self.keyword_total.captures(l))
            .filter_map(|c| parse_amount(c.get(1)?.as_str()))
            .filter(|v| *v > Decimal::ZERO && *v < self.value_ceiling)
            .max()
    }

    fn currency_marked(&self, raw: &str) -> Option<Decimal> {
        re_currency_amount()
            .captures_iter(raw)
            .filter_map(|c| parse_amount(c.get(1)?.as_str()))
            .filter(|v| *v > Decimal::ZERO && *v < self.value_ceiling)
            .max()
    }

    fn bare_decimal(&self, raw: &str) -> Option<Decimal> {
        re_bare_amount()
            .find_iter(raw)
            .filter_map(|m| parse_amount(m.as_str()))
            .filter(|v| *v < self.fallback_ceiling && !self.is_likely_year(*v))
            .max()
            .filter(|v| *v > Decimal::ZERO)
    }

    /// `2024,00` is far more often a misread date than a price.
    fn is_likely_year(&self, value: Decimal) -> bool {
        value.fract().is_zero() && self.year_guard.contains(&value)
    }
}

// ── Amount parsing ────────────────────────────────────────────────────────────

/// Parse `22,90` or `22.90`. Returns `None` for anything `Decimal` rejects.
fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replacen(',', ".", 1)).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
