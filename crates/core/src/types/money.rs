//! Decimal money helpers.
//!
//! All monetary arithmetic uses `rust_decimal::Decimal` - never binary
//! floating point - so totals cannot drift at the cent level. Rounding
//! is half-up at two fractional digits, applied once per derived total.

use rust_decimal::{Decimal, RoundingStrategy};

/// Quantize a monetary amount to two fractional digits, rounding half-up.
#[must_use]
pub fn quantize(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Line total for a unit price and quantity, quantized.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    quantize(unit_price * Decimal::from(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_half_up() {
        assert_eq!(quantize(Decimal::new(10005, 3)), Decimal::new(1001, 2)); // 10.005 -> 10.01
        assert_eq!(quantize(Decimal::new(10004, 3)), Decimal::new(1000, 2)); // 10.004 -> 10.00
    }

    #[test]
    fn test_quantize_is_stable_at_two_places() {
        let amount = Decimal::new(29900, 2); // 299.00
        assert_eq!(quantize(amount), amount);
    }

    #[test]
    fn test_line_total() {
        // 2 x 100.00 = 200.00
        assert_eq!(
            line_total(Decimal::new(10000, 2), 2),
            Decimal::new(20000, 2)
        );
        // 3 x 19.99 = 59.97
        assert_eq!(line_total(Decimal::new(1999, 2), 3), Decimal::new(5997, 2));
    }

    #[test]
    fn test_line_total_quantizes_fractional_prices() {
        // 3 x 0.335 = 1.005 -> 1.01 (half-up, applied once)
        assert_eq!(line_total(Decimal::new(335, 3), 3), Decimal::new(101, 2));
    }
}
