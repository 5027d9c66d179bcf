//! Customer-facing order routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::models::{Order, OrderItem};
use crate::services::lookup;
use crate::state::AppState;

/// Order lookup form body.
#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub order_number: String,
    #[serde(default)]
    pub email: String,
}

/// An order with its line items.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Look up an order by number and email.
#[instrument(skip(state, form))]
pub async fn track(
    State(state): State<AppState>,
    Json(form): Json<TrackRequest>,
) -> Result<Json<OrderDetail>> {
    let (order, items) = lookup::track_order(&state, &form.order_number, &form.email).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// Show an order by number, as linked from the checkout confirmation.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<OrderDetail>> {
    let (order, items) = lookup::get_order(&state, &number).await?;
    Ok(Json(OrderDetail { order, items }))
}
