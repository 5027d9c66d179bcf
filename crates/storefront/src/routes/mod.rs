//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products               - Active product listing
//! GET  /products/{slug}        - Product detail with bundle components and related picks
//!
//! # Cart
//! GET    /cart                 - Cart contents resolved against the catalog
//! GET    /cart/summary         - Compact count + subtotal for the drawer badge
//! POST   /cart/add             - Add a product to the cart
//! POST   /cart/update          - Set a line quantity (zero removes)
//! POST   /cart/remove          - Remove a line
//!
//! # Checkout and orders
//! POST /checkout               - Place an order from the session cart
//! POST /orders/track           - Order status lookup (number + email)
//! GET  /orders/{number}        - Order detail by number
//!
//! # Contact
//! POST /contact                - Forward a message to the shop inbox
//!
//! # Dashboard (session auth required beyond login)
//! POST   /dashboard/login            - Named account or shared secret
//! POST   /dashboard/logout           - Drop the auth marker
//! GET    /dashboard/summary          - Order KPIs
//! GET    /dashboard/orders           - Order listing with status/search filter
//! GET    /dashboard/orders/{number}  - Order detail
//! PATCH  /dashboard/orders/{number}  - Update status, notes, tracking
//! DELETE /dashboard/orders/{number}  - Delete an order
//! POST   /dashboard/products         - Create a product
//! PATCH  /dashboard/products/{id}    - Update a product
//! ```

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/summary", get(cart::summary))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/track", post(orders::track))
        .route("/{number}", get(orders::show))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(dashboard::login))
        .route("/logout", post(dashboard::logout))
        .route("/summary", get(dashboard::summary))
        .route("/orders", get(dashboard::list_orders))
        .route(
            "/orders/{number}",
            get(dashboard::show_order)
                .patch(dashboard::update_order)
                .delete(dashboard::delete_order),
        )
        .route("/products", post(dashboard::create_product))
        .route("/products/{id}", patch(dashboard::update_product))
}

/// Assemble every application route under one router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/dashboard", dashboard_routes())
        .route("/checkout", post(checkout::place))
        .route("/contact", post(contact::submit))
}
