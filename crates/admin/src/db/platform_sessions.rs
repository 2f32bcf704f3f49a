//! Commerce platform session repository.
//!
//! Persists the platform's session records (offline access tokens and
//! granted scopes) keyed by an opaque session id. This is the storage half
//! of the platform SDK's session contract: load, store, delete, and
//! find-by-shop.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use super::RepositoryError;

/// A platform session record.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct PlatformSession {
    /// Opaque session id assigned by the platform SDK.
    pub session_id: String,
    /// Shop domain this session belongs to.
    pub shop_domain: String,
    /// Offline access token (HIGH PRIVILEGE - redacted in debug output).
    pub access_token: SecretString,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Expiry, if the platform issued a short-lived token.
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for PlatformSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformSession")
            .field("session_id", &self.session_id)
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct PlatformSessionRow {
    session_id: String,
    shop_domain: String,
    access_token: String,
    scope: String,
    expires_at: Option<DateTime<Utc>>,
}

impl From<PlatformSessionRow> for PlatformSession {
    fn from(row: PlatformSessionRow) -> Self {
        let scopes = row
            .scope
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            session_id: row.session_id,
            shop_domain: row.shop_domain,
            access_token: SecretString::from(row.access_token),
            scopes,
            expires_at: row.expires_at,
        }
    }
}

/// Repository for platform session database operations.
pub struct PlatformSessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PlatformSessionRepository<'a> {
    /// Create a new platform session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load a session by its opaque id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(
        &self,
        session_id: &str,
    ) -> Result<Option<PlatformSession>, RepositoryError> {
        let row = sqlx::query_as::<_, PlatformSessionRow>(
            "SELECT session_id, shop_domain, access_token, scope, expires_at \
             FROM platform_sessions WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(PlatformSession::from))
    }

    /// Store or update a session record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn store(&self, session: &PlatformSession) -> Result<(), RepositoryError> {
        let scope = session.scopes.join(",");

        sqlx::query(
            "INSERT INTO platform_sessions (session_id, shop_domain, access_token, scope, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (session_id) DO UPDATE SET \
                 shop_domain = EXCLUDED.shop_domain, \
                 access_token = EXCLUDED.access_token, \
                 scope = EXCLUDED.scope, \
                 expires_at = EXCLUDED.expires_at, \
                 updated_at = NOW()",
        )
        .bind(&session.session_id)
        .bind(&session.shop_domain)
        .bind(session.access_token.expose_secret())
        .bind(scope)
        .bind(session.expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a session by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM platform_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find the offline session for a shop, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_shop(
        &self,
        shop_domain: &str,
    ) -> Result<Option<PlatformSession>, RepositoryError> {
        let row = sqlx::query_as::<_, PlatformSessionRow>(
            "SELECT session_id, shop_domain, access_token, scope, expires_at \
             FROM platform_sessions WHERE shop_domain = $1 \
             ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(shop_domain)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(PlatformSession::from))
    }

    /// Delete every session for a shop (app uninstall).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_shop(&self, shop_domain: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM platform_sessions WHERE shop_domain = $1")
            .bind(shop_domain)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Replace the stored scopes for a shop's sessions (scope update webhook).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_scopes(
        &self,
        shop_domain: &str,
        scopes: &[String],
    ) -> Result<(), RepositoryError> {
        let scope = scopes.join(",");
        sqlx::query(
            "UPDATE platform_sessions SET scope = $2, updated_at = NOW() WHERE shop_domain = $1",
        )
        .bind(shop_domain)
        .bind(scope)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_access_token() {
        let session = PlatformSession {
            session_id: "offline_test-shop".to_string(),
            shop_domain: "test-shop.myplatform.com".to_string(),
            access_token: SecretString::from("shpat_super_secret_token"),
            scopes: vec!["read_products".to_string()],
            expires_at: None,
        };

        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("test-shop.myplatform.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_super_secret_token"));
    }

    #[test]
    fn test_row_scope_splitting() {
        let row = PlatformSessionRow {
            session_id: "s1".to_string(),
            shop_domain: "shop.example".to_string(),
            access_token: "tok".to_string(),
            scope: "read_products, write_orders,,read_customers".to_string(),
            expires_at: None,
        };

        let session = PlatformSession::from(row);
        assert_eq!(
            session.scopes,
            vec!["read_products", "write_orders", "read_customers"]
        );
    }
}
