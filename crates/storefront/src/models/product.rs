//! Catalog product models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use sharp_core::ProductId;

/// A catalog product.
///
/// `slug` is assigned once at first save and never silently changed;
/// `is_active` gates public visibility (deactivation is a soft state -
/// products referenced by order history are never hard-deleted).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_bundle: bool,
    pub created_at: DateTime<Utc>,
}

/// One component row of a bundle: the component product and how many of
/// it the bundle contains.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BundleComponent {
    #[sqlx(flatten)]
    pub product: Product,
    pub quantity: i32,
}
