//! Strict decimal parsing for amount text.
//!
//! Accepted: optional sign, digits, optional fractional part, surrounding
//! whitespace. Everything else (thousands separators, exponents, `NaN`,
//! `inf`, empty text) is an `InvalidAmount`.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{EngineError, Result};

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sign>[+-])?(?P<int>[0-9]*)(?:\.(?P<frac>[0-9]+))?$")
        .expect("valid amount pattern")
});

/// Parse decimal amount text without any coercion.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let invalid = || EngineError::InvalidAmount { raw: raw.to_string() };

    let caps = AMOUNT_RE.captures(raw.trim()).ok_or_else(invalid)?;
    let int = caps.name("int").map_or("", |m| m.as_str());
    let frac = caps.name("frac").map(|m| m.as_str());

    // "", "-" and "." all slip past the pattern with no digits at all
    if int.is_empty() && frac.is_none() {
        return Err(invalid());
    }

    let int = if int.is_empty() { "0" } else { int };
    let text = match frac {
        Some(frac) => format!("{int}.{frac}"),
        None => int.to_string(),
    };

    let value = Decimal::from_str(&text).map_err(|_| invalid())?;
    match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => Ok(-value),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_plain_amounts() {
        assert_eq!(parse_amount("250").unwrap(), d("250"));
        assert_eq!(parse_amount("1499.50").unwrap(), d("1499.50"));
        assert_eq!(parse_amount(" 42.1 ").unwrap(), d("42.1"));
    }

    #[test]
    fn test_signs_and_leading_dot() {
        assert_eq!(parse_amount("-15.00").unwrap(), d("-15.00"));
        assert_eq!(parse_amount("+7").unwrap(), d("7"));
        assert_eq!(parse_amount(".5").unwrap(), d("0.5"));
    }

    #[test]
    fn test_rejects_coercible_text() {
        let rejected = [
            "", "  ", "-", ".", "NaN", "inf", "1e3", "1,000", "12abc", "0x10", "5.", "1_000",
        ];
        for raw in rejected {
            assert_eq!(
                parse_amount(raw),
                Err(EngineError::InvalidAmount { raw: raw.to_string() }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(parse_amount(&huge).is_err());
    }
}
