//! Fixed-precision quantity handling.
//!
//! All inventory quantities use `rust_decimal::Decimal` with exactly two
//! fractional digits. Binary floats are never used; long replay chains must
//! not accumulate rounding drift.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of fractional digits carried by every stored quantity.
pub const QUANTITY_SCALE: u32 = 2;

/// Parses a raw quantity string into a fixed two-decimal quantity.
///
/// Returns `None` when the string is not a valid decimal number. The result
/// is rescaled to [`QUANTITY_SCALE`] using banker's rounding, matching the
/// precision of the balance and transaction columns.
#[must_use]
pub fn parse_fixed(raw: &str) -> Option<Decimal> {
    let parsed = Decimal::from_str(raw.trim()).ok()?;
    Some(parsed.round_dp(QUANTITY_SCALE))
}

/// Formats a quantity as a fixed-point string with two decimals.
///
/// Used for wire serialization so callers never see float drift.
#[must_use]
pub fn format_fixed(quantity: Decimal) -> String {
    format!("{:.2}", quantity.round_dp(QUANTITY_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100", dec!(100))]
    #[case("40.25", dec!(40.25))]
    // Banker's rounding when the input carries excess precision.
    #[case("1.005", dec!(1.00))]
    #[case("1.015", dec!(1.02))]
    #[case("  7.5 ", dec!(7.50))]
    // Positivity is a builder rule, not a parsing rule.
    #[case("-5", dec!(-5))]
    fn test_parse_fixed_accepts(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_fixed(raw), Some(expected));
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("1,5")]
    fn test_parse_fixed_rejects(#[case] raw: &str) {
        assert_eq!(parse_fixed(raw), None);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(dec!(100)), "100.00");
        assert_eq!(format_fixed(dec!(60.00)), "60.00");
        assert_eq!(format_fixed(dec!(-3.5)), "-3.50");
    }
}
