//! Order repository: the durable order ledger.
//!
//! Order numbers are unique by constraint, not by pre-check: each
//! placement attempt inserts with a fresh random number inside its own
//! transaction and regenerates on a unique violation. Header and item
//! rows commit together or not at all.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use sharp_core::{OrderNumber, OrderStatus, ProductId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

/// Columns selected for a full `Order` row.
const ORDER_COLUMNS: &str = "id, order_number, created_at, updated_at, full_name, phone, email, \
     address_line1, city, province, zip_code, shipping_method, payment_method, \
     subtotal, shipping_cost, discount_total, grand_total, status, notes, tracking_number";

/// Bounded retries for order-number generation. The keyspace holds a
/// million numbers, so more than a couple of collisions in a row means
/// something is badly wrong.
const MAX_NUMBER_ATTEMPTS: u32 = 10;

/// Hard cap on dashboard listing results.
const LIST_CAP: i64 = 200;

/// Header fields for a new order (totals already computed).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub full_name: String,
    pub phone: String,
    pub email: Option<sharp_core::Email>,
    pub address_line1: String,
    pub city: String,
    pub province: String,
    pub zip_code: String,
    pub shipping_method: String,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
    pub notes: String,
}

/// One frozen line-item snapshot for a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Dashboard listing filter.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Restrict to one status; `None` lists all.
    pub status: Option<OrderStatus>,
    /// Case-insensitive substring matched against order number, name,
    /// email, and phone (OR-combined).
    pub query: Option<String>,
}

/// Operational fields the dashboard may edit.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    pub notes: String,
    pub tracking_number: Option<String>,
}

/// Aggregates for the dashboard KPI summary.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct OrderKpis {
    pub pending_count: i64,
    pub today_count: i64,
    pub sales_30_days: Decimal,
}

/// Repository for order ledger database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order atomically, generating a unique order number.
    ///
    /// Each attempt runs in its own transaction: insert the header with
    /// a fresh `SH-######`, and on a unique-violation roll back and
    /// regenerate. Items are inserted in the same transaction as the
    /// winning header.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `MAX_NUMBER_ATTEMPTS`
    /// consecutive collisions occur, `RepositoryError::Database` for
    /// other failures.
    pub async fn create(
        &self,
        new: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = OrderNumber::generate();
            let mut tx = self.pool.begin().await?;

            match insert_header(&mut tx, &number, new).await {
                Ok(order) => {
                    for item in items {
                        insert_item(&mut tx, order.id, item).await?;
                    }
                    tx.commit().await?;
                    return Ok(order);
                }
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await?;
                    tracing::debug!(
                        attempt,
                        number = %number,
                        "order number collision, regenerating"
                    );
                }
                Err(e) => return Err(RepositoryError::Database(e)),
            }
        }

        Err(RepositoryError::Conflict(
            "order number generation exhausted retries".to_owned(),
        ))
    }

    /// Load an order by its canonical order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if absent.
    pub async fn get_by_number(&self, number: &OrderNumber) -> Result<Order, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM shop_order WHERE order_number = $1");
        sqlx::query_as::<_, Order>(&sql)
            .bind(number)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// The frozen line items of an order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: sharp_core::OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, name, unit_price, quantity, line_total \
             FROM order_item WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Dashboard listing: optional status filter plus free-text search,
    /// newest first, capped at 200 rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM shop_order \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::text IS NULL \
                    OR order_number ILIKE $2 OR full_name ILIKE $2 \
                    OR email ILIKE $2 OR phone ILIKE $2) \
             ORDER BY created_at DESC LIMIT $3"
        );
        let pattern = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{q}%"));
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(pattern)
            .bind(LIST_CAP)
            .fetch_all(self.pool)
            .await?;
        Ok(orders)
    }

    /// Persist the dashboard-editable fields, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if absent.
    pub async fn update(
        &self,
        number: &OrderNumber,
        update: &OrderUpdate,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            "UPDATE shop_order \
             SET status = $2, notes = $3, tracking_number = $4, updated_at = now() \
             WHERE order_number = $1 RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(number)
            .bind(update.status)
            .bind(&update.notes)
            .bind(&update.tracking_number)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Hard-delete an order; its items cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if absent.
    pub async fn delete(&self, number: &OrderNumber) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop_order WHERE order_number = $1")
            .bind(number)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// KPI aggregates for the dashboard summary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn kpis(&self, now: DateTime<Utc>) -> Result<OrderKpis, RepositoryError> {
        let kpis = sqlx::query_as::<_, OrderKpis>(
            "SELECT \
               COUNT(*) FILTER (WHERE status = 'pending') AS pending_count, \
               COUNT(*) FILTER (WHERE created_at::date = $1::date) AS today_count, \
               COALESCE(SUM(grand_total) FILTER (WHERE created_at >= $1 - interval '30 days'), 0) \
                 AS sales_30_days \
             FROM shop_order",
        )
        .bind(now)
        .fetch_one(self.pool)
        .await?;
        Ok(kpis)
    }
}

async fn insert_header(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    number: &OrderNumber,
    new: &NewOrder,
) -> Result<Order, sqlx::Error> {
    let sql = format!(
        "INSERT INTO shop_order \
         (order_number, full_name, phone, email, address_line1, city, province, zip_code, \
          shipping_method, payment_method, subtotal, shipping_cost, discount_total, \
          grand_total, notes, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         RETURNING {ORDER_COLUMNS}"
    );
    sqlx::query_as::<_, Order>(&sql)
        .bind(number)
        .bind(&new.full_name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.address_line1)
        .bind(&new.city)
        .bind(&new.province)
        .bind(&new.zip_code)
        .bind(&new.shipping_method)
        .bind(&new.payment_method)
        .bind(new.subtotal)
        .bind(new.shipping_cost)
        .bind(new.discount_total)
        .bind(new.grand_total)
        .bind(&new.notes)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut **tx)
        .await
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: sharp_core::OrderId,
    item: &NewOrderItem,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO order_item (order_id, product_id, name, unit_price, quantity, line_total) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(&item.name)
    .bind(item.unit_price)
    .bind(item.quantity)
    .bind(item.line_total)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        db_err.is_unique_violation()
    } else {
        false
    }
}
