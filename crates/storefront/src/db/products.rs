//! Product repository: the catalog store.
//!
//! Slug assignment happens here: a slug is derived from the name at
//! first save (or taken from the caller), then suffixed `-2`, `-3`, ...
//! until unique. Re-saving a product without touching its slug never
//! changes it.

use rust_decimal::Decimal;
use sqlx::PgPool;

use sharp_core::ProductId;

use super::RepositoryError;
use crate::models::{BundleComponent, Product};

/// Columns selected for a full `Product` row.
const PRODUCT_COLUMNS: &str = "id, name, slug, short_description, description, price, \
     image_url, is_active, is_bundle, created_at";

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    /// Explicit slug; derived from `name` when `None`.
    pub slug: Option<String>,
    pub short_description: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_bundle: bool,
    /// Bundle composition; ignored unless `is_bundle`.
    pub components: Vec<NewComponent>,
}

/// One bundle component reference with its quantity.
#[derive(Debug, Clone, Copy)]
pub struct NewComponent {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Input for updating a product. `slug: None` keeps the stored slug.
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub name: String,
    pub slug: Option<String>,
    pub short_description: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_bundle: bool,
    pub components: Vec<NewComponent>,
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All active products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE is_active ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Look up an active product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for missing or inactive products.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Product, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE slug = $1 AND is_active");
        sqlx::query_as::<_, Product>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Look up a product by id, optionally restricted to active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when missing (or inactive with
    /// `active_only`).
    pub async fn get_by_id(
        &self,
        id: ProductId,
        active_only: bool,
    ) -> Result<Product, RepositoryError> {
        self.find_by_id(id, active_only)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Like [`Self::get_by_id`] but absence is `None` rather than an error.
    ///
    /// Cart materialization uses this: a vanished or deactivated product
    /// silently drops out of the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: ProductId,
        active_only: bool,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = if active_only {
            format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1 AND is_active")
        } else {
            format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1")
        };
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// A sample of other active products for the detail page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn related(
        &self,
        exclude: ProductId,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE is_active AND id <> $1 ORDER BY name LIMIT $2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(exclude)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Ordered bundle composition; empty for non-bundle products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn components(
        &self,
        parent: ProductId,
    ) -> Result<Vec<BundleComponent>, RepositoryError> {
        let sql = format!(
            "SELECT p.{}, pc.quantity FROM product_component pc \
             JOIN product p ON p.id = pc.component_id \
             WHERE pc.parent_id = $1 ORDER BY pc.id",
            PRODUCT_COLUMNS.replace(", ", ", p.")
        );
        let components = sqlx::query_as::<_, BundleComponent>(&sql)
            .bind(parent)
            .fetch_all(self.pool)
            .await?;
        Ok(components)
    }

    /// Create a product, assigning a unique slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the name is already taken,
    /// `RepositoryError::Database` otherwise.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let base = new.slug.clone().unwrap_or_else(|| slugify(&new.name));
        let slug = self.resolve_unique_slug(&base, None).await?;

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO product \
             (name, slug, short_description, description, price, image_url, is_active, is_bundle) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&new.name)
            .bind(&slug)
            .bind(&new.short_description)
            .bind(&new.description)
            .bind(new.price)
            .bind(&new.image_url)
            .bind(new.is_active)
            .bind(new.is_bundle)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("product name already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        if new.is_bundle {
            insert_components(&mut tx, product.id, &new.components).await?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Update a product; the stored slug is kept unless a new one is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for missing products,
    /// `RepositoryError::Conflict` for name collisions.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let slug = match &changes.slug {
            Some(requested) => Some(self.resolve_unique_slug(requested, Some(id)).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE product SET \
             name = $2, slug = COALESCE($3, slug), short_description = $4, description = $5, \
             price = $6, image_url = $7, is_active = $8, is_bundle = $9 \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&slug)
            .bind(&changes.short_description)
            .bind(&changes.description)
            .bind(changes.price)
            .bind(&changes.image_url)
            .bind(changes.is_active)
            .bind(changes.is_bundle)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("product name already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?
            .ok_or(RepositoryError::NotFound)?;

        // Replace the bundle composition wholesale
        sqlx::query("DELETE FROM product_component WHERE parent_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if changes.is_bundle {
            insert_components(&mut tx, id, &changes.components).await?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Resolve a base slug to a unique one by suffixing `-2`, `-3`, ...
    ///
    /// `exclude` skips the product itself when updating.
    async fn resolve_unique_slug(
        &self,
        base: &str,
        exclude: Option<ProductId>,
    ) -> Result<String, RepositoryError> {
        let base = if base.is_empty() { "product" } else { base };
        let mut candidate = base.to_owned();
        let mut n = 2;
        while self.slug_taken(&candidate, exclude).await? {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        Ok(candidate)
    }

    async fn slug_taken(
        &self,
        slug: &str,
        exclude: Option<ProductId>,
    ) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM product WHERE slug = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(self.pool)
        .await?;
        Ok(taken)
    }
}

async fn insert_components(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    parent: ProductId,
    components: &[NewComponent],
) -> Result<(), RepositoryError> {
    for component in components {
        sqlx::query(
            "INSERT INTO product_component (parent_id, component_id, quantity) \
             VALUES ($1, $2, $3)",
        )
        .bind(parent)
        .bind(component.product_id)
        .bind(component.quantity.max(1))
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "duplicate bundle component {}",
                    component.product_id
                ));
            }
            RepositoryError::Database(e)
        })?;
    }
    Ok(())
}

/// Derive a URL token from a product name: lowercase, alphanumeric runs
/// joined by single hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress leading hyphen
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_owned();
    if slug.is_empty() {
        "product".to_owned()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Sharp Blade 500"), "sharp-blade-500");
    }

    #[test]
    fn test_slugify_collapses_punctuation_runs() {
        assert_eq!(slugify("Chef's  Knife -- Pro!"), "chef-s-knife-pro");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  Whetstone  "), "whetstone");
        assert_eq!(slugify("...Honing Rod"), "honing-rod");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify(""), "product");
        assert_eq!(slugify("!!!"), "product");
    }

    #[test]
    fn test_slugify_non_ascii_dropped() {
        assert_eq!(slugify("Couteau à pain"), "couteau-pain");
    }
}
