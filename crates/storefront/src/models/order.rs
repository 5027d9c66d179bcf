//! Order ledger models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use sharp_core::{Email, OrderId, OrderItemId, OrderNumber, OrderStatus, ProductId};

/// A placed order.
///
/// Customer and shipping fields are immutable once placed; `status`,
/// `notes`, and `tracking_number` are the operational fields the
/// dashboard may edit. Monetary fields satisfy
/// `grand_total == subtotal + shipping_cost - discount_total` at two
/// decimal places.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Customer
    pub full_name: String,
    pub phone: String,
    pub email: Option<Email>,
    pub address_line1: String,
    pub city: String,
    pub province: String,
    pub zip_code: String,

    // Choices
    pub shipping_method: String,
    pub payment_method: String,

    // Totals
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,

    // Operational
    pub status: OrderStatus,
    pub notes: String,
    pub tracking_number: Option<String>,
}

/// A frozen line-item snapshot owned by one order.
///
/// `name`, `unit_price`, and `line_total` are copied from the product at
/// placement time and never re-derived, so order history is immune to
/// later catalog edits.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}
