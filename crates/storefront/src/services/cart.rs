//! Session cart operations.
//!
//! The cart lives in the server-side session as a map of product id to
//! quantity. Every mutation loads the map, applies the change, and
//! writes the whole map back, then re-materializes against the live
//! catalog so callers always see current prices and availability.

use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;

use sharp_core::{ProductId, line_total, quantize};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::models::{CartContents, session_keys};
use crate::state::AppState;

/// A cart line resolved against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CartRow {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Cart contents resolved against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub rows: Vec<CartRow>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

impl CartView {
    /// True when no stored line resolved to an active product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Compact summary for the cart drawer badge.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.item_count,
            subtotal: self.subtotal,
        }
    }
}

/// Compact cart summary for badges and drawers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartSummary {
    pub item_count: u32,
    pub subtotal: Decimal,
}

/// Load the session cart, initializing an empty one on first touch.
pub async fn contents(session: &Session) -> Result<CartContents> {
    let stored: Option<CartContents> = session
        .get(session_keys::CART)
        .await
        .map_err(session_error)?;

    match stored {
        Some(cart) => Ok(cart),
        None => {
            let cart = CartContents::new();
            store(session, &cart).await?;
            Ok(cart)
        }
    }
}

/// Add a quantity of a product to the cart.
///
/// The product must exist and be active; quantities below one are
/// clamped to one.
pub async fn add(state: &AppState, session: &Session, id: ProductId, quantity: i64) -> Result<CartView> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id, true)
        .await?;

    let mut cart = contents(session).await?;
    let quantity = u32::try_from(quantity.max(1)).unwrap_or(1);
    cart.add(product.id, quantity);
    store(session, &cart).await?;

    materialize(state, &cart).await
}

/// Set the quantity of a cart line. Zero or below removes the line, as
/// does a product that no longer resolves to something active.
pub async fn update(
    state: &AppState,
    session: &Session,
    id: ProductId,
    quantity: i64,
) -> Result<CartView> {
    let mut cart = contents(session).await?;

    let resolves = quantity > 0
        && ProductRepository::new(state.pool())
            .find_by_id(id, true)
            .await?
            .is_some();
    if resolves {
        cart.set(id, quantity);
    } else {
        cart.remove(id);
    }
    store(session, &cart).await?;

    materialize(state, &cart).await
}

/// Remove a cart line. Removing an absent line is a no-op.
pub async fn remove(state: &AppState, session: &Session, id: ProductId) -> Result<CartView> {
    let mut cart = contents(session).await?;
    cart.remove(id);
    store(session, &cart).await?;

    materialize(state, &cart).await
}

/// Drop every line from the cart.
pub async fn clear(session: &Session) -> Result<()> {
    store(session, &CartContents::new()).await
}

/// Resolve stored cart lines against the catalog.
///
/// Lines whose product has been deleted or deactivated since they were
/// added are skipped, not errors. The surviving rows are ordered by
/// ascending product id.
pub async fn materialize(state: &AppState, cart: &CartContents) -> Result<CartView> {
    let products = ProductRepository::new(state.pool());

    let mut rows = Vec::new();
    let mut subtotal = Decimal::ZERO;
    let mut item_count: u32 = 0;

    for (id, quantity) in cart.entries() {
        let Some(product) = products.find_by_id(id, false).await? else {
            tracing::debug!(product_id = %id, "Skipping cart line for missing product");
            continue;
        };
        if !product.is_active {
            tracing::debug!(product_id = %id, "Skipping cart line for inactive product");
            continue;
        }

        let line = line_total(product.price, quantity);
        subtotal += line;
        item_count += quantity;
        rows.push(CartRow {
            product,
            quantity,
            line_total: line,
        });
    }

    Ok(CartView {
        rows,
        subtotal: quantize(subtotal),
        item_count,
    })
}

async fn store(session: &Session, cart: &CartContents) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(session_error)
}

fn session_error(err: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session store failure: {err}"))
}
