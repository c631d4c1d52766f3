// =================================================================
// utils.rs - Rounding and numeric conversion helpers
// =================================================================

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Round a float to a fixed number of decimal places for reporting.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Convert a finite float into a `Decimal`, falling back to zero for values
/// `Decimal` cannot represent.
pub fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(1.23456, 1), 1.2);
        assert_eq!(round_to(-0.456, 2), -0.46);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn test_decimal_conversions() {
        assert_eq!(decimal_from_f64(0.25), dec!(0.25));
        assert_eq!(decimal_from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(decimal_to_f64(dec!(-12.5)), -12.5);
    }
}
