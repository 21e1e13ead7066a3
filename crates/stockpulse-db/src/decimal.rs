//! Conversions between the pipeline's `f64` scores and `NUMERIC` columns.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// `value` rounded to `scale` decimal places; non-finite input becomes zero.
pub(crate) fn to_decimal(value: f64, scale: u32) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(scale)
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_column_scale() {
        assert_eq!(to_decimal(0.123_456, 3), Decimal::new(123, 3));
        assert_eq!(to_decimal(-0.5, 3), Decimal::new(-5, 1));
        assert_eq!(to_decimal(40.0, 2), Decimal::new(40, 0));
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN, 3), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY, 3), Decimal::ZERO);
    }

    #[test]
    fn converts_back() {
        assert!((to_f64(Decimal::new(875, 3)) - 0.875).abs() < 1e-9);
    }
}
