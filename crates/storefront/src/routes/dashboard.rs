//! Operator dashboard route handlers.
//!
//! Everything past `/dashboard/login` requires the session auth marker
//! via the `RequireDashboardAuth` extractor.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use sharp_core::{OrderNumber, OrderStatus, ProductId};

use crate::db::orders::{OrderFilter, OrderKpis, OrderRepository, OrderUpdate};
use crate::db::products::{NewComponent, NewProduct, ProductChanges, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireDashboardAuth, clear_dashboard_auth, set_dashboard_auth};
use crate::models::{Order, Product};
use crate::routes::orders::OrderDetail;
use crate::services::{auth, notifications};
use crate::state::AppState;

// =============================================================================
// Authentication
// =============================================================================

/// Login form body. An empty username selects the shared-secret gate.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub display_name: String,
}

/// Authenticate a dashboard session.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let Some(context) = auth::authenticate(&state, &form.username, &form.password).await? else {
        tracing::info!("Dashboard login rejected");
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    };

    // Rotate the session id so a pre-login cookie cannot carry auth
    session
        .cycle_id()
        .await
        .map_err(|err| AppError::Internal(format!("session store failure: {err}")))?;
    set_dashboard_auth(&session, &context)
        .await
        .map_err(|err| AppError::Internal(format!("session store failure: {err}")))?;

    tracing::info!(user = %context.display_name(), "Dashboard login");
    Ok(Json(LoginResponse {
        display_name: context.display_name().to_string(),
    }))
}

/// Drop the dashboard auth marker.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_dashboard_auth(&session)
        .await
        .map_err(|err| AppError::Internal(format!("session store failure: {err}")))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Orders
// =============================================================================

/// KPI summary for the dashboard landing view.
#[instrument(skip_all)]
pub async fn summary(
    State(state): State<AppState>,
    RequireDashboardAuth(_auth): RequireDashboardAuth,
) -> Result<Json<OrderKpis>> {
    let kpis = OrderRepository::new(state.pool()).kpis(Utc::now()).await?;
    Ok(Json(kpis))
}

/// Listing filter query string.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    /// Restrict to one status.
    pub status: Option<String>,
    /// Substring search over number, name, email, and phone.
    pub q: Option<String>,
}

/// List orders, newest first.
#[instrument(skip_all)]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireDashboardAuth(_auth): RequireDashboardAuth,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    // "all" and an absent filter both mean every status
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let filter = OrderFilter {
        status,
        query: query.q.filter(|q| !q.trim().is_empty()),
    };

    let orders = OrderRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(orders))
}

/// Show one order with its items.
#[instrument(skip_all)]
pub async fn show_order(
    State(state): State<AppState>,
    RequireDashboardAuth(_auth): RequireDashboardAuth,
    Path(number): Path<String>,
) -> Result<Json<OrderDetail>> {
    let number = parse_number(&number)?;
    let repo = OrderRepository::new(state.pool());
    let order = repo.get_by_number(&number).await?;
    let items = repo.items(order.id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// Order edit body.
#[derive(Debug, Deserialize)]
pub struct OrderUpdateRequest {
    pub status: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
}

/// Order edit response; `changed` is false when the submitted fields
/// already matched the stored order.
#[derive(Debug, Serialize)]
pub struct OrderUpdateResponse {
    pub changed: bool,
    #[serde(flatten)]
    pub order: Order,
}

/// Update an order's operational fields.
///
/// A status or tracking change triggers a best-effort customer
/// notification after the write commits; a notes-only edit does not.
#[instrument(skip_all)]
pub async fn update_order(
    State(state): State<AppState>,
    RequireDashboardAuth(auth): RequireDashboardAuth,
    Path(number): Path<String>,
    Json(form): Json<OrderUpdateRequest>,
) -> Result<Json<OrderUpdateResponse>> {
    let number = parse_number(&number)?;
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|err: sharp_core::InvalidStatus| AppError::Validation(err.to_string()))?;

    let repo = OrderRepository::new(state.pool());
    let before = repo.get_by_number(&number).await?;

    let update = normalize_update(status, &form.notes, form.tracking_number);

    let OrderDiff { changed, notify } = order_diff(&before, &update);
    if !changed {
        return Ok(Json(OrderUpdateResponse {
            changed: false,
            order: before,
        }));
    }

    let order = repo.update(&number, &update).await?;

    tracing::info!(
        order = %order.order_number,
        status = %order.status,
        user = %auth.display_name(),
        "Order updated"
    );

    if notify {
        notifications::order_status_update(&state, &order).await;
    }

    Ok(Json(OrderUpdateResponse {
        changed: true,
        order,
    }))
}

/// Delete an order and its items.
#[instrument(skip_all)]
pub async fn delete_order(
    State(state): State<AppState>,
    RequireDashboardAuth(auth): RequireDashboardAuth,
    Path(number): Path<String>,
) -> Result<StatusCode> {
    let number = parse_number(&number)?;
    OrderRepository::new(state.pool()).delete(&number).await?;

    tracing::info!(order = %number, user = %auth.display_name(), "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_number(raw: &str) -> Result<OrderNumber> {
    OrderNumber::parse(raw).map_err(|err| AppError::BadRequest(err.to_string()))
}

/// What an order edit actually changes.
struct OrderDiff {
    /// Any operational field differs; false means a pure no-op.
    changed: bool,
    /// Status or tracking differs; a notes-only edit persists silently.
    notify: bool,
}

fn order_diff(before: &Order, update: &OrderUpdate) -> OrderDiff {
    let notify = before.status != update.status || before.tracking_number != update.tracking_number;
    OrderDiff {
        changed: notify || before.notes != update.notes,
        notify,
    }
}

/// Trim the free-text edit fields; a blank tracking number clears it.
fn normalize_update(
    status: OrderStatus,
    notes: &str,
    tracking_number: Option<String>,
) -> OrderUpdate {
    OrderUpdate {
        status,
        notes: notes.trim().to_string(),
        tracking_number: tracking_number
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
    }
}

// =============================================================================
// Products
// =============================================================================

/// Product create/update body.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    /// Explicit slug; derived from the name when absent.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_bundle: bool,
    #[serde(default)]
    pub components: Vec<ComponentForm>,
}

/// One bundle component in a product form.
#[derive(Debug, Deserialize)]
pub struct ComponentForm {
    pub product_id: ProductId,
    #[serde(default = "default_component_quantity")]
    pub quantity: i32,
}

const fn default_true() -> bool {
    true
}

const fn default_component_quantity() -> i32 {
    1
}

impl ProductForm {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::Validation(
                "price must not be negative".to_string(),
            ));
        }
        if self.components.iter().any(|c| c.quantity < 1) {
            return Err(AppError::Validation(
                "component quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn components(&self) -> Vec<NewComponent> {
        self.components
            .iter()
            .map(|c| NewComponent {
                product_id: c.product_id,
                quantity: c.quantity,
            })
            .collect()
    }
}

/// Create a product.
#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    RequireDashboardAuth(auth): RequireDashboardAuth,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<Product>)> {
    form.validate()?;

    let components = form.components();
    let new = NewProduct {
        name: form.name.trim().to_string(),
        slug: form.slug,
        short_description: form.short_description,
        description: form.description,
        price: form.price,
        image_url: form.image_url,
        is_active: form.is_active,
        is_bundle: form.is_bundle,
        components,
    };

    let product = ProductRepository::new(state.pool()).create(new).await?;
    tracing::info!(
        product = %product.slug,
        user = %auth.display_name(),
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product, replacing its bundle composition wholesale.
#[instrument(skip_all)]
pub async fn update_product(
    State(state): State<AppState>,
    RequireDashboardAuth(auth): RequireDashboardAuth,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Product>> {
    form.validate()?;

    let components = form.components();
    let changes = ProductChanges {
        name: form.name.trim().to_string(),
        slug: form.slug,
        short_description: form.short_description,
        description: form.description,
        price: form.price,
        image_url: form.image_url,
        is_active: form.is_active,
        is_bundle: form.is_bundle,
        components,
    };

    let product = ProductRepository::new(state.pool()).update(id, changes).await?;
    tracing::info!(
        product = %product.slug,
        user = %auth.display_name(),
        "Product updated"
    );
    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use sharp_core::OrderId;

    use super::*;

    fn stored_order() -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::new(1),
            order_number: OrderNumber::parse("SH-123456").expect("valid number"),
            created_at: now,
            updated_at: now,
            full_name: "Ada Lovelace".to_string(),
            phone: "0900000000".to_string(),
            email: None,
            address_line1: "1 Analytical Way".to_string(),
            city: "London".to_string(),
            province: "London".to_string(),
            zip_code: "0000".to_string(),
            shipping_method: "standard".to_string(),
            payment_method: "cod".to_string(),
            subtotal: Decimal::new(50000, 2),
            shipping_cost: Decimal::new(0, 2),
            discount_total: Decimal::new(0, 2),
            grand_total: Decimal::new(50000, 2),
            status: OrderStatus::Confirmed,
            notes: "leave at the door".to_string(),
            tracking_number: None,
        }
    }

    #[test]
    fn test_notes_only_edit_persists_without_notification() {
        let before = stored_order();
        let update = normalize_update(before.status, "call on arrival", None);
        let diff = order_diff(&before, &update);
        assert!(diff.changed);
        assert!(!diff.notify);
    }

    #[test]
    fn test_tracking_only_edit_notifies() {
        let before = stored_order();
        let update = normalize_update(before.status, &before.notes, Some("TRK-99".to_string()));
        let diff = order_diff(&before, &update);
        assert!(diff.changed);
        assert!(diff.notify);
    }

    #[test]
    fn test_status_change_notifies() {
        let before = stored_order();
        let update = normalize_update(OrderStatus::Shipped, &before.notes, None);
        let diff = order_diff(&before, &update);
        assert!(diff.changed);
        assert!(diff.notify);
    }

    #[test]
    fn test_identical_submission_is_a_no_op() {
        let before = stored_order();
        let update = normalize_update(before.status, &before.notes, None);
        let diff = order_diff(&before, &update);
        assert!(!diff.changed);
        assert!(!diff.notify);
    }

    #[test]
    fn test_notes_whitespace_does_not_count_as_a_change() {
        let before = stored_order();
        let update = normalize_update(before.status, "  leave at the door \n", None);
        assert_eq!(update.notes, before.notes);
        let diff = order_diff(&before, &update);
        assert!(!diff.changed);
    }

    #[test]
    fn test_blank_tracking_number_clears_to_none() {
        let update = normalize_update(OrderStatus::Confirmed, "", Some("   ".to_string()));
        assert_eq!(update.tracking_number, None);
    }
}
