// 🔢 Amount Validation + Formatting
//
// Input rule: positive decimal, at most two fractional digits.
// Accepted while typing: "12", "12.", "12.5", "12.50", ".5"

use crate::error::{ConverterError, Result};
use regex::Regex;
use std::sync::OnceLock;

static AMOUNT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn amount_pattern() -> &'static Regex {
    AMOUNT_PATTERN.get_or_init(|| {
        Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)$").expect("amount pattern is a valid regex")
    })
}

/// Parse user input into a positive amount.
pub fn parse_amount(input: &str) -> Result<f64> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ConverterError::invalid_amount(input, "amount is empty"));
    }

    if !amount_pattern().is_match(trimmed) {
        return Err(ConverterError::invalid_amount(input, "not a decimal number"));
    }

    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > 2 {
            return Err(ConverterError::invalid_amount(
                input,
                "at most two decimal places",
            ));
        }
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ConverterError::invalid_amount(input, "not a decimal number"))?;

    if !value.is_finite() {
        return Err(ConverterError::invalid_amount(input, "amount is too large"));
    }

    if value <= 0.0 {
        return Err(ConverterError::invalid_amount(input, "amount must be positive"));
    }

    Ok(value)
}

/// Round half-up to two decimal places.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    // Absorb binary representation error (1.005 * 100 = 100.49999...) before rounding
    let nudged = scaled + scaled.signum() * scaled.abs() * f64::EPSILON;
    nudged.round() / 100.0
}

/// Render an amount the way derived fields display it: always two decimals.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round2(value))
}

pub fn format_rate(rate: f64) -> String {
    format!("{:.4}", rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_amounts() {
        assert_eq!(parse_amount("100"), Ok(100.0));
        assert_eq!(parse_amount("12."), Ok(12.0));
        assert_eq!(parse_amount("12.5"), Ok(12.5));
        assert_eq!(parse_amount("12.50"), Ok(12.5));
        assert_eq!(parse_amount(".5"), Ok(0.5));
        assert_eq!(parse_amount(" 7 "), Ok(7.0));
        assert_eq!(parse_amount("0.01"), Ok(0.01));
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        for input in ["0", "0.00", "-5", "-0.01", "."] {
            assert!(
                matches!(parse_amount(input), Err(ConverterError::InvalidAmount { .. })),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_rejects_three_decimals() {
        let err = parse_amount("1.234").unwrap_err();
        assert_eq!(
            err,
            ConverterError::InvalidAmount {
                input: "1.234".to_string(),
                reason: "at most two decimal places".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_non_numeric() {
        for input in ["", "abc", "1e3", "1,000", "1.2.3", "NaN", "inf", "+5"] {
            assert!(parse_amount(input).is_err(), "expected {:?} to be rejected", input);
        }
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(90.0), 90.0);
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(100.00000000000001), 100.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(90.0), "90.00");
        assert_eq!(format_amount(100.0 / 3.0), "33.33");
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_rate(0.9), "0.9000");
    }
}
