//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::models::{BundleComponent, Product};
use crate::state::AppState;

/// How many related products accompany a detail view.
const RELATED_LIMIT: i64 = 4;

/// Product detail payload: the product, its bundle composition, and a
/// handful of related picks.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub components: Vec<BundleComponent>,
    pub related: Vec<Product>,
}

/// List every active product, alphabetically.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list_active().await?;
    Ok(Json(products))
}

/// Show one active product by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let repo = ProductRepository::new(state.pool());
    let product = repo.get_by_slug(&slug).await?;

    let components = if product.is_bundle {
        repo.components(product.id).await?
    } else {
        Vec::new()
    };
    let related = repo.related(product.id, RELATED_LIMIT).await?;

    Ok(Json(ProductDetail {
        product,
        components,
        related,
    }))
}
