//! Type-safe price representation and BRL formatting.
//!
//! Prices use decimal arithmetic end to end. Rounding to two places only
//! happens when a value is turned into display text.
//!
//! # Formatting paths
//!
//! [`format_brl_in`] first tries locale-aware formatting. When the requested
//! locale has no formatting rules it falls back to `"R$ " + fixed(2)`, which
//! keeps `.` as the decimal separator and does not group thousands:
//!
//! ```rust
//! use loja_core::{Locale, format_brl_in};
//! use rust_decimal::Decimal;
//!
//! let amount = Decimal::new(123_456, 2);
//! assert_eq!(format_brl_in(amount, &Locale::PtBr), "R$ 1.234,56");
//! assert_eq!(format_brl_in(amount, &Locale::parse("en-US")), "R$ 1234.56");
//! ```
//!
//! The two outputs differ on purpose; callers that need pt-BR text must make
//! sure the locale is configured.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a BRL price from an amount in centavos.
    #[must_use]
    pub fn from_centavos(centavos: i64) -> Self {
        Self::new(Decimal::new(centavos, 2), CurrencyCode::BRL)
    }

    /// Unit price multiplied by a quantity, without rounding.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.amount * Decimal::from(quantity)
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_brl(self.amount))
    }
}

/// ISO 4217 currency codes accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BRL => "BRL",
        }
    }
}

/// Errors raised by the locale-aware formatting path.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// No separator rules exist for this locale tag.
    #[error("no currency formatting rules for locale '{0}'")]
    Unsupported(String),
}

/// A locale used for currency formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Locale {
    /// Brazilian Portuguese (`pt-BR`).
    #[default]
    PtBr,
    /// Any other tag. Kept verbatim so errors can name it.
    Other(String),
}

/// Grouping and decimal separators for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Separators {
    group: char,
    decimal: char,
}

impl Locale {
    /// Parse a BCP 47-ish tag. Accepts `pt-BR`, `pt_BR` and any casing.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        if normalized == "pt-br" {
            Self::PtBr
        } else {
            Self::Other(tag.trim().to_owned())
        }
    }

    /// The tag as it should appear in logs and configuration.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::PtBr => "pt-BR",
            Self::Other(tag) => tag,
        }
    }

    fn separators(&self) -> Result<Separators, LocaleError> {
        match self {
            Self::PtBr => Ok(Separators {
                group: '.',
                decimal: ',',
            }),
            Self::Other(tag) => Err(LocaleError::Unsupported(tag.clone())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Format an amount as BRL text using pt-BR conventions.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    format_brl_in(amount, &Locale::PtBr)
}

/// Format an amount as BRL text in `locale`, falling back to fixed-point
/// text when the locale cannot be honoured.
#[must_use]
pub fn format_brl_in(amount: Decimal, locale: &Locale) -> String {
    format_localized(amount, locale).unwrap_or_else(|_| format_fixed(amount))
}

/// Locale-aware formatting, e.g. `R$ 1.234,56`.
///
/// # Errors
///
/// Returns [`LocaleError::Unsupported`] when `locale` has no rules.
pub fn format_localized(amount: Decimal, locale: &Locale) -> Result<String, LocaleError> {
    let separators = locale.separators()?;
    let (negative, units, cents) = split_centavos(amount);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separators.group);
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    Ok(format!(
        "{sign}{} {grouped}{}{cents:02}",
        CurrencyCode::BRL.symbol(),
        separators.decimal
    ))
}

/// Fixed-point formatting, e.g. `R$ 1234.56`. Never localized.
#[must_use]
pub fn format_fixed(amount: Decimal) -> String {
    let (negative, units, cents) = split_centavos(amount);
    let sign = if negative { "-" } else { "" };
    format!("{} {sign}{units}.{cents:02}", CurrencyCode::BRL.symbol())
}

/// Round to centavos (half away from zero) and split into sign, whole reais
/// and remaining centavos.
fn split_centavos(amount: Decimal) -> (bool, u128, u128) {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let centavos = rounded.mantissa();
    let negative = centavos < 0;
    let magnitude = centavos.unsigned_abs();
    (negative, magnitude / 100, magnitude % 100)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap_or_default()
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_format_pads_single_decimal() {
        assert_eq!(format_brl(dec("9.9")), "R$ 9,90");
        assert_eq!(format_brl(dec("37.7")), "R$ 37,70");
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_brl(dec("1234.56")), "R$ 1.234,56");
        assert_eq!(format_brl(dec("1234567")), "R$ 1.234.567,00");
        assert_eq!(format_brl(dec("999.99")), "R$ 999,99");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(format_brl(dec("0.005")), "R$ 0,01");
        assert_eq!(format_brl(dec("2.344")), "R$ 2,34");
        assert_eq!(format_brl(dec("999.995")), "R$ 1.000,00");
    }

    #[test]
    fn test_fallback_is_not_localized() {
        let other = Locale::parse("en-US");
        assert_eq!(format_brl_in(dec("1234.5"), &other), "R$ 1234.50");
        assert_eq!(format_brl_in(Decimal::ZERO, &other), "R$ 0.00");
    }

    #[test]
    fn test_localized_rejects_unknown_locale() {
        let err = format_localized(Decimal::ONE, &Locale::parse("fr-FR")).unwrap_err();
        assert_eq!(err, LocaleError::Unsupported("fr-FR".to_string()));
    }

    #[test]
    fn test_locale_parse_is_lenient() {
        assert_eq!(Locale::parse("pt-BR"), Locale::PtBr);
        assert_eq!(Locale::parse(" pt_br "), Locale::PtBr);
        assert_eq!(Locale::parse("PT-BR").tag(), "pt-BR");
    }

    #[test]
    fn test_price_times_is_exact() {
        let price = Price::from_centavos(1490);
        assert_eq!(price.times(2), dec("29.80"));
        assert_eq!(price.to_string(), "R$ 14,90");
    }

    #[test]
    fn test_price_deserializes_with_default_currency() {
        let price: Price = serde_json::from_str(r#"{"amount":"7.90"}"#).unwrap();
        assert_eq!(price, Price::from_centavos(790));
    }
}
