//! Cart route handlers.
//!
//! All cart endpoints return the freshly materialized cart so clients
//! can render the result of a mutation without a second round trip.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sharp_core::ProductId;

use crate::error::Result;
use crate::services::cart::{self, CartSummary, CartView};
use crate::state::AppState;

/// Body for cart line mutations.
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Show the current cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let stored = cart::contents(&session).await?;
    Ok(Json(cart::materialize(&state, &stored).await?))
}

/// Compact cart summary for the drawer badge.
#[instrument(skip(state, session))]
pub async fn summary(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let stored = cart::contents(&session).await?;
    let view = cart::materialize(&state, &stored).await?;
    Ok(Json(view.summary()))
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(line): Json<CartLineRequest>,
) -> Result<Json<CartView>> {
    let view = cart::add(&state, &session, line.product_id, line.quantity).await?;
    Ok(Json(view))
}

/// Set a line quantity; zero or below removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(line): Json<CartLineRequest>,
) -> Result<Json<CartView>> {
    let view = cart::update(&state, &session, line.product_id, line.quantity).await?;
    Ok(Json(view))
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(line): Json<CartLineRequest>,
) -> Result<Json<CartView>> {
    let view = cart::remove(&state, &session, line.product_id).await?;
    Ok(Json(view))
}
