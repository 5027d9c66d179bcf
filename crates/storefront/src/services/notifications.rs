//! Best-effort transactional email flows.
//!
//! Every function here absorbs delivery failures. An order that is
//! already committed to the ledger must never be rolled back or
//! surfaced as an error because the SMTP relay is down; failures are
//! logged and the request proceeds.

use crate::db::orders::NewOrderItem;
use crate::models::Order;
use crate::state::AppState;

/// Email the customer a confirmation for a freshly placed order.
pub async fn order_confirmation(state: &AppState, order: &Order, items: &[NewOrderItem]) {
    let Some(email) = &order.email else {
        tracing::debug!(order = %order.order_number, "No customer email, skipping confirmation");
        return;
    };

    let lines: Vec<String> = items
        .iter()
        .map(|item| item_line(&item.name, item.quantity, &item.line_total.to_string()))
        .collect();

    let subject = format!("Order {} confirmed", order.order_number);
    let body = format!(
        "Hi {},\n\n\
         Thanks for your order! Here is what we received:\n\n\
         {}\n\
         Subtotal: {}\n\
         Shipping: {}\n\
         Total: {}\n\n\
         Payment: cash on delivery.\n\
         You can check your order status any time:\n{}\n",
        order.full_name,
        lines.join("\n"),
        order.subtotal,
        order.shipping_cost,
        order.grand_total,
        status_link(state, order),
    );

    deliver(state, email.as_str(), &subject, &body).await;
}

/// Alert the operator inbox that a new order landed.
pub async fn operator_new_order(state: &AppState, order: &Order, items: &[NewOrderItem]) {
    let Some(to) = &state.config().order_alert_email else {
        tracing::debug!("No order alert address configured, skipping operator email");
        return;
    };

    let lines: Vec<String> = items
        .iter()
        .map(|item| item_line(&item.name, item.quantity, &item.line_total.to_string()))
        .collect();

    let subject = format!("New order {}", order.order_number);
    let body = format!(
        "New order from {} ({}).\n\n\
         {}\n\
         Total: {}\n\
         Ship to: {}, {}, {} {}\n",
        order.full_name,
        order.phone,
        lines.join("\n"),
        order.grand_total,
        order.address_line1,
        order.city,
        order.province,
        order.zip_code,
    );

    deliver(state, to, &subject, &body).await;
}

/// Tell the customer their order status changed.
pub async fn order_status_update(state: &AppState, order: &Order) {
    let Some(email) = &order.email else {
        tracing::debug!(order = %order.order_number, "No customer email, skipping status update");
        return;
    };

    let tracking = order
        .tracking_number
        .as_deref()
        .map(|number| format!("Tracking number: {number}\n"))
        .unwrap_or_default();

    let subject = format!("Order {} is now {}", order.order_number, order.status.label());
    let body = format!(
        "Hi {},\n\n\
         Your order {} is now {}.\n\
         {}\n\
         Check the latest status here:\n{}\n",
        order.full_name,
        order.order_number,
        order.status.label(),
        tracking,
        status_link(state, order),
    );

    deliver(state, email.as_str(), &subject, &body).await;
}

/// Forward a contact form message to the shop inbox.
pub async fn contact_message(state: &AppState, name: &str, reply_to: &str, message: &str) {
    let config = state.config();
    let Some(to) = config.contact_email.as_ref().or(config.order_alert_email.as_ref()) else {
        tracing::warn!("No contact inbox configured, dropping contact message");
        return;
    };

    let subject = format!("Contact form message from {name}");
    let body = format!("From: {name} <{reply_to}>\n\n{message}\n");

    deliver(state, to, &subject, &body).await;
}

/// Auto-reply to a contact form sender.
pub async fn contact_auto_reply(state: &AppState, name: &str, reply_to: &str) {
    let subject = "We received your message".to_string();
    let body = format!(
        "Hi {name},\n\n\
         Thanks for getting in touch. We have received your message and\n\
         will get back to you as soon as we can.\n"
    );

    deliver(state, reply_to, &subject, &body).await;
}

fn item_line(name: &str, quantity: i32, line_total: &str) -> String {
    format!("  {quantity} x {name} = {line_total}")
}

fn status_link(state: &AppState, order: &Order) -> String {
    state
        .config()
        .absolute_url(&format!("/orders/{}", order.order_number))
}

/// Deliver one message, logging instead of propagating failures.
async fn deliver(state: &AppState, to: &str, subject: &str, body: &str) {
    if let Err(err) = state.mailer().deliver(to, subject, body).await {
        tracing::warn!(to = %to, subject = %subject, error = %err, "Email delivery failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_line_format() {
        assert_eq!(item_line("Rosewood Table", 2, "900.00"), "  2 x Rosewood Table = 900.00");
    }
}
