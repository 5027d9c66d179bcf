//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::Order;
use crate::services::checkout::{self, CheckoutDetails};
use crate::state::AppState;

/// Checkout form body. Only name, phone, and address are required;
/// everything else defaults.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub shipping_method: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub notes: String,
}

/// Place an order from the session cart.
#[instrument(skip(state, session, form))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let details = CheckoutDetails {
        full_name: form.full_name,
        phone: form.phone,
        email: form.email,
        address_line1: form.address_line1,
        city: form.city,
        province: form.province,
        zip_code: form.zip_code,
        shipping_method: form.shipping_method,
        payment_method: form.payment_method,
        notes: form.notes,
    };

    let order = checkout::place_order(&state, &session, details).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
