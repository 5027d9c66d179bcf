//! Shipping tiers and order totals.

use rust_decimal::Decimal;
use serde::Serialize;

use sharp_core::quantize;

/// Standard (free) shipping tier.
pub const STANDARD_SHIPPING: &str = "standard";

/// Express shipping tier, priced from configuration.
pub const EXPRESS_SHIPPING: &str = "express";

/// Cost of shipping for a method keyword.
///
/// Unrecognized methods fall back to the standard tier rather than
/// failing checkout.
#[must_use]
pub fn shipping_cost(method: &str, express_cost: Decimal) -> Decimal {
    match method {
        EXPRESS_SHIPPING => quantize(express_cost),
        _ => quantize(Decimal::ZERO),
    }
}

/// Computed monetary breakdown for an order.
#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
}

impl Totals {
    /// Compute totals for a cart subtotal and shipping method.
    ///
    /// Maintains `grand_total == subtotal + shipping_cost - discount_total`
    /// at two decimal places.
    #[must_use]
    pub fn compute(subtotal: Decimal, shipping_method: &str, express_cost: Decimal) -> Self {
        let subtotal = quantize(subtotal);
        let shipping = shipping_cost(shipping_method, express_cost);
        let discount = quantize(Decimal::ZERO);

        Self {
            subtotal,
            shipping_cost: shipping,
            discount_total: discount,
            grand_total: quantize(subtotal + shipping - discount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPRESS_COST: Decimal = Decimal::from_parts(299, 0, 0, false, 0);

    #[test]
    fn test_standard_shipping_is_free() {
        assert_eq!(shipping_cost("standard", EXPRESS_COST), Decimal::new(0, 2));
    }

    #[test]
    fn test_express_shipping_uses_configured_cost() {
        assert_eq!(
            shipping_cost("express", EXPRESS_COST),
            Decimal::new(29900, 2)
        );
    }

    #[test]
    fn test_unrecognized_method_falls_back_to_standard() {
        assert_eq!(
            shipping_cost("overnight-drone", EXPRESS_COST),
            Decimal::new(0, 2)
        );
        assert_eq!(shipping_cost("", EXPRESS_COST), Decimal::new(0, 2));
    }

    #[test]
    fn test_totals_invariant_holds() {
        // 1234.5 + 299.00 - 0.00 = 1533.50
        let totals = Totals::compute(Decimal::new(12345, 1), "express", EXPRESS_COST);
        assert_eq!(totals.subtotal, Decimal::new(123450, 2));
        assert_eq!(totals.shipping_cost, Decimal::new(29900, 2));
        assert_eq!(totals.discount_total, Decimal::new(0, 2));
        assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.shipping_cost - totals.discount_total
        );
        assert_eq!(totals.grand_total, Decimal::new(153350, 2));
    }

    #[test]
    fn test_totals_standard_shipping() {
        let totals = Totals::compute(Decimal::new(50, 0), "standard", EXPRESS_COST);
        assert_eq!(totals.grand_total, Decimal::new(5000, 2));
    }
}
