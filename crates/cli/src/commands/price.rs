//! Price formatting command.

use std::io::Write;
use std::str::FromStr;

use loja_core::{Locale, format_brl_in};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Invalid amount {input:?}: {source}")]
    InvalidAmount {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse `amount` and print it formatted for `locale`.
///
/// A comma is accepted as the decimal separator (`37,7`).
///
/// # Errors
///
/// Returns an error if `amount` is not a decimal number or writing fails.
pub fn format(out: &mut impl Write, amount: &str, locale: &str) -> Result<(), PriceError> {
    let input = amount.trim();
    let normalized = if input.contains('.') {
        input.to_owned()
    } else {
        input.replace(',', ".")
    };
    let value = Decimal::from_str(&normalized).map_err(|source| PriceError::InvalidAmount {
        input: input.to_owned(),
        source,
    })?;

    writeln!(out, "{}", format_brl_in(value, &Locale::parse(locale)))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn run(amount: &str, locale: &str) -> String {
        let mut out = Vec::new();
        format(&mut out, amount, locale).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_pt_br() {
        assert_eq!(run("37.7", "pt-BR"), "R$ 37,70\n");
        assert_eq!(run("1234,5", "pt-BR"), "R$ 1.234,50\n");
    }

    #[test]
    fn test_fallback_locale() {
        assert_eq!(run("1234.5", "xx"), "R$ 1234.50\n");
    }

    #[test]
    fn test_invalid_amount() {
        let mut out = Vec::new();
        let err = format(&mut out, "abc", "pt-BR").unwrap_err();
        assert!(matches!(err, PriceError::InvalidAmount { .. }));
    }
}
