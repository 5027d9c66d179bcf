//! Customer-facing order lookup.
//!
//! Lookups never reveal whether an order number exists: a bad number, a
//! missing order, and an email mismatch all produce the same generic
//! not-found answer.

use sharp_core::{Email, OrderNumber};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::{Order, OrderItem};
use crate::state::AppState;

const GENERIC_NOT_FOUND: &str = "no order matches those details";

/// Find an order by number and verify the customer email.
///
/// # Errors
///
/// Returns a generic `AppError::NotFound` for unparseable numbers,
/// missing orders, and email mismatches alike.
pub async fn track_order(
    state: &AppState,
    raw_number: &str,
    submitted_email: &str,
) -> Result<(Order, Vec<OrderItem>)> {
    let Ok(number) = OrderNumber::parse(raw_number) else {
        return Err(not_found());
    };

    let orders = OrderRepository::new(state.pool());
    let order = match orders.get_by_number(&number).await {
        Ok(order) => order,
        Err(crate::db::RepositoryError::NotFound) => return Err(not_found()),
        Err(err) => return Err(err.into()),
    };

    if !email_matches(order.email.as_ref(), submitted_email) {
        tracing::debug!(order = %number, "Order lookup email mismatch");
        return Err(not_found());
    }

    let items = orders.items(order.id).await?;
    Ok((order, items))
}

/// Load an order and its items by number alone.
///
/// Used for the confirmation link a customer receives right after
/// checkout; the number itself is the capability.
pub async fn get_order(state: &AppState, raw_number: &str) -> Result<(Order, Vec<OrderItem>)> {
    let number = OrderNumber::parse(raw_number).map_err(|_| not_found())?;

    let orders = OrderRepository::new(state.pool());
    let order = orders.get_by_number(&number).await?;
    let items = orders.items(order.id).await?;
    Ok((order, items))
}

fn not_found() -> AppError {
    AppError::NotFound(GENERIC_NOT_FOUND.to_string())
}

/// The email gate only applies when the customer actually entered one:
/// a blank submission allows lookup by order number alone. An order
/// without a stored email has nothing to check against and also skips
/// the gate.
fn email_matches(stored: Option<&Email>, submitted: &str) -> bool {
    if submitted.trim().is_empty() {
        return true;
    }
    match stored {
        Some(email) => email.matches(submitted),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_matches_case_insensitive() {
        let email = Email::parse("Customer@Example.com").expect("valid email");
        assert!(email_matches(Some(&email), "customer@example.com"));
        assert!(email_matches(Some(&email), "  CUSTOMER@EXAMPLE.COM  "));
        assert!(!email_matches(Some(&email), "other@example.com"));
    }

    #[test]
    fn test_email_matches_blank_submission_allows_number_only_lookup() {
        let email = Email::parse("customer@example.com").expect("valid email");
        assert!(email_matches(Some(&email), ""));
        assert!(email_matches(Some(&email), "   "));
    }

    #[test]
    fn test_email_matches_skips_check_without_stored_email() {
        assert!(email_matches(None, ""));
        assert!(email_matches(None, "anyone@example.com"));
    }
}
