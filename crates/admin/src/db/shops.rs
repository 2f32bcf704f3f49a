//! Shop (tenant) database operations.
//!
//! Every other query helper is scoped by the internal shop id resolved
//! here. Callers must treat an unknown domain as fatal for authenticated
//! routes.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use offerdesk_core::ShopId;

use super::RepositoryError;

/// A row from the `shops` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopRow {
    pub id: ShopId,
    /// Platform shop domain (e.g., your-store.myplatform.com).
    pub domain: String,
    pub name: Option<String>,
    pub installed_at: DateTime<Utc>,
    pub uninstalled_at: Option<DateTime<Utc>>,
}

/// Resolve an external shop domain to the internal tenant id.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if no shop matches the domain, or
/// [`RepositoryError::Database`] if the query fails.
pub async fn resolve_shop_id(pool: &PgPool, domain: &str) -> Result<ShopId, RepositoryError> {
    let id = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM shops WHERE domain = $1 AND uninstalled_at IS NULL",
    )
    .bind(domain)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(ShopId::new(id))
}

/// Fetch a shop row by id.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the shop does not exist.
pub async fn get_shop(pool: &PgPool, shop_id: ShopId) -> Result<ShopRow, RepositoryError> {
    sqlx::query_as::<_, ShopRow>(
        "SELECT id, domain, name, installed_at, uninstalled_at FROM shops WHERE id = $1",
    )
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Register a shop on install, reviving a previously uninstalled row.
///
/// Returns the internal shop id.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the upsert fails.
pub async fn upsert_shop(
    pool: &PgPool,
    domain: &str,
    name: Option<&str>,
) -> Result<ShopId, RepositoryError> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO shops (domain, name) \
         VALUES ($1, $2) \
         ON CONFLICT (domain) DO UPDATE SET \
             name = COALESCE(EXCLUDED.name, shops.name), \
             uninstalled_at = NULL \
         RETURNING id",
    )
    .bind(domain)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(ShopId::new(id))
}

/// Mark a shop as uninstalled (app uninstall webhook).
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the update fails.
pub async fn mark_uninstalled(pool: &PgPool, domain: &str) -> Result<bool, RepositoryError> {
    let result = sqlx::query("UPDATE shops SET uninstalled_at = NOW() WHERE domain = $1")
        .bind(domain)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
