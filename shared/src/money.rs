//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Order totals carry a flat 10% GST on top
//! of the line subtotal.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// GST rate applied to order subtotals (0.10)
pub const GST_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Maximum allowed price per unit ($1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
///
/// Input values should be validated with [`is_valid_price`] at the boundary.
/// If NaN/Infinity somehow reaches here, logs an error and returns ZERO
/// to avoid silent data corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with max input <= 1_000_000 (validated at boundary)
        // is always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Whether a raw price is usable: finite, non-negative, within bounds
#[inline]
pub fn is_valid_price(value: f64) -> bool {
    value.is_finite() && (0.0..=MAX_PRICE).contains(&value)
}

/// Whether a line quantity is usable: positive, within bounds
#[inline]
pub fn is_valid_quantity(quantity: i32) -> bool {
    (1..=MAX_QUANTITY).contains(&quantity)
}

/// Line subtotal: unit_price * quantity, rounded to the cent
pub fn line_subtotal(unit_price: f64, quantity: i32) -> Decimal {
    (to_decimal(unit_price) * Decimal::from(quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Order total: subtotal plus 10% GST, rounded to the cent
pub fn order_total(subtotal: Decimal) -> Decimal {
    (subtotal * (Decimal::ONE + GST_RATE))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal_to_the_cent() {
        assert_eq!(to_f64(line_subtotal(1899.00, 2)), 3798.00);
        assert_eq!(to_f64(line_subtotal(0.10, 3)), 0.30);
    }

    #[test]
    fn test_order_total_applies_gst() {
        // (2*1899.00 + 1999.00) * 1.10 = 6376.70
        let subtotal = line_subtotal(1899.00, 2) + line_subtotal(1999.00, 1);
        assert_eq!(to_f64(order_total(subtotal)), 6376.70);
    }

    #[test]
    fn test_order_total_rounds_half_up() {
        // 0.05 * 1.10 = 0.055 -> 0.06
        assert_eq!(to_f64(order_total(to_decimal(0.05))), 0.06);
    }

    #[test]
    fn test_money_eq_tolerance() {
        assert!(money_eq(10.004, 10.0));
        assert!(!money_eq(10.02, 10.0));
    }

    #[test]
    fn test_price_and_quantity_bounds() {
        assert!(is_valid_price(0.0));
        assert!(is_valid_price(999_999.99));
        assert!(!is_valid_price(-0.01));
        assert!(!is_valid_price(f64::NAN));
        assert!(!is_valid_price(f64::INFINITY));
        assert!(is_valid_quantity(1));
        assert!(!is_valid_quantity(0));
        assert!(!is_valid_quantity(10_000));
    }

    #[test]
    fn test_to_decimal_non_finite_defaults_to_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }
}
