//! Order placement.
//!
//! Checkout re-materializes the session cart against the live catalog,
//! validates the customer details, computes totals, and writes the
//! order atomically. Confirmation emails run after the commit and are
//! strictly best-effort.

use tower_sessions::Session;

use sharp_core::{Email, line_total};

use crate::db::orders::{NewOrder, NewOrderItem, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::services::{cart, notifications, pricing};
use crate::state::AppState;

/// Customer-supplied checkout details, as received from the request.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub city: String,
    pub province: String,
    pub zip_code: String,
    pub shipping_method: String,
    pub payment_method: String,
    pub notes: String,
}

/// Place an order from the session cart.
///
/// # Errors
///
/// Returns `AppError::EmptyCart` when no cart line resolves to an
/// active product, `AppError::Validation` when required contact fields
/// are blank.
pub async fn place_order(
    state: &AppState,
    session: &Session,
    details: CheckoutDetails,
) -> Result<Order> {
    let stored = cart::contents(session).await?;
    let view = cart::materialize(state, &stored).await?;
    if view.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let details = normalize(details)?;
    let email = parse_optional_email(&details.email);

    let totals = pricing::Totals::compute(
        view.subtotal,
        &details.shipping_method,
        state.config().express_shipping_cost,
    );

    let items: Vec<NewOrderItem> = view
        .rows
        .iter()
        .map(|row| NewOrderItem {
            product_id: row.product.id,
            name: row.product.name.clone(),
            unit_price: row.product.price,
            quantity: i32::try_from(row.quantity).unwrap_or(i32::MAX),
            line_total: line_total(row.product.price, row.quantity),
        })
        .collect();

    let new = NewOrder {
        full_name: details.full_name,
        phone: details.phone,
        email,
        address_line1: details.address_line1,
        city: details.city,
        province: details.province,
        zip_code: details.zip_code,
        shipping_method: details.shipping_method,
        payment_method: details.payment_method,
        subtotal: totals.subtotal,
        shipping_cost: totals.shipping_cost,
        discount_total: totals.discount_total,
        grand_total: totals.grand_total,
        notes: details.notes,
    };

    let order = OrderRepository::new(state.pool()).create(&new, &items).await?;

    tracing::info!(
        order = %order.order_number,
        total = %order.grand_total,
        items = items.len(),
        "Order placed"
    );

    // The order is committed; a failed clear or email must not undo it.
    if let Err(err) = cart::clear(session).await {
        tracing::warn!(order = %order.order_number, error = %err, "Failed to clear cart after checkout");
    }
    notifications::order_confirmation(state, &order, &items).await;
    notifications::operator_new_order(state, &order, &items).await;

    Ok(order)
}

/// Trim every field, apply defaults, and check the required ones.
fn normalize(details: CheckoutDetails) -> Result<CheckoutDetails> {
    let trim = |s: String| s.trim().to_string();

    let full_name = trim(details.full_name);
    let phone = trim(details.phone);
    let address_line1 = trim(details.address_line1);

    if full_name.is_empty() || phone.is_empty() || address_line1.is_empty() {
        return Err(AppError::Validation(
            "full name, phone, and address are required".to_string(),
        ));
    }

    let shipping_method = {
        let method = trim(details.shipping_method);
        if method.is_empty() {
            pricing::STANDARD_SHIPPING.to_string()
        } else {
            method
        }
    };
    let payment_method = {
        let method = trim(details.payment_method);
        if method.is_empty() { "cod".to_string() } else { method }
    };

    Ok(CheckoutDetails {
        full_name,
        phone,
        email: trim(details.email),
        address_line1,
        city: trim(details.city),
        province: trim(details.province),
        zip_code: trim(details.zip_code),
        shipping_method,
        payment_method,
        notes: trim(details.notes),
    })
}

/// Parse an optional customer email; invalid addresses are dropped, not
/// fatal, because email only gates notifications and lookup matching.
fn parse_optional_email(raw: &str) -> Option<Email> {
    if raw.trim().is_empty() {
        return None;
    }
    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(err) => {
            tracing::debug!(error = %err, "Dropping invalid checkout email");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            full_name: "  Amina Khalil  ".to_string(),
            phone: "0912-345-678".to_string(),
            email: "amina@example.com".to_string(),
            address_line1: "12 Cedar Road".to_string(),
            city: "Khartoum".to_string(),
            province: "Khartoum".to_string(),
            zip_code: "11111".to_string(),
            shipping_method: String::new(),
            payment_method: String::new(),
            notes: " leave at the gate ".to_string(),
        }
    }

    #[test]
    fn test_normalize_trims_and_defaults() {
        let normalized = normalize(details()).expect("valid details");
        assert_eq!(normalized.full_name, "Amina Khalil");
        assert_eq!(normalized.shipping_method, "standard");
        assert_eq!(normalized.payment_method, "cod");
        assert_eq!(normalized.notes, "leave at the gate");
    }

    #[test]
    fn test_normalize_rejects_blank_required_fields() {
        for blank_field in ["full_name", "phone", "address_line1"] {
            let mut d = details();
            match blank_field {
                "full_name" => d.full_name = "   ".to_string(),
                "phone" => d.phone = String::new(),
                _ => d.address_line1 = "\t".to_string(),
            }
            assert!(matches!(normalize(d), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_normalize_keeps_explicit_shipping_method() {
        let mut d = details();
        d.shipping_method = " express ".to_string();
        let normalized = normalize(d).expect("valid details");
        assert_eq!(normalized.shipping_method, "express");
    }

    #[test]
    fn test_parse_optional_email() {
        assert!(parse_optional_email("").is_none());
        assert!(parse_optional_email("   ").is_none());
        assert!(parse_optional_email("not-an-email").is_none());
        assert_eq!(
            parse_optional_email("amina@example.com").map(|e| e.as_str().to_string()),
            Some("amina@example.com".to_string())
        );
    }
}
