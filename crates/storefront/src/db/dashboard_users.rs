//! Dashboard user repository.
//!
//! Backs the identity-based dashboard login path. Users are provisioned
//! out of band (see `migrations/`); the storefront only reads them.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use sharp_core::DashboardUserId;

use super::RepositoryError;

/// A dashboard operator account with its argon2 password hash.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardUser {
    pub id: DashboardUserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for dashboard user lookups.
pub struct DashboardUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardUserRepository<'a> {
    /// Create a new dashboard user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find an operator account by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DashboardUser>, RepositoryError> {
        let user = sqlx::query_as::<_, DashboardUser>(
            "SELECT id, username, password_hash, created_at \
             FROM dashboard_user WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }
}
