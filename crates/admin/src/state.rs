//! Shared application state for the admin panel.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::enum_cache::EnumCache;
use crate::platform::{PlatformClient, PlatformError};

/// Shared state available to all route handlers via `State`.
///
/// Cheap to clone: the pool and client are handle types and the rest is
/// behind `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// `PostgreSQL` connection pool.
    pub pool: PgPool,
    /// Application configuration.
    pub config: Arc<AdminConfig>,
    /// Platform Admin API client.
    pub platform: PlatformClient,
    /// Cached database enum values.
    pub enum_cache: Arc<EnumCache>,
}

impl AppState {
    /// Build the application state from configuration and a pool.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the HTTP client cannot be built.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, PlatformError> {
        let platform = PlatformClient::new(config.platform())?;
        let enum_cache = Arc::new(EnumCache::new(pool.clone()));

        Ok(Self {
            pool,
            config: Arc::new(config),
            platform,
            enum_cache,
        })
    }
}
