//! Database operations for the admin `PostgreSQL` database.
//!
//! # Tables
//!
//! - `shops` - Merchant tenants, keyed by platform shop domain
//! - `platform_sessions` - Commerce platform session records (tokens, scopes)
//! - `consumers` - Shopper identities
//! - `campaigns` / `programs` - Offer campaign configuration
//! - `carts` / `cart_items` - Cart aggregates synced from the platform
//! - `offers` / `counter_offers` - The offer workflow rows
//! - `variants` / `variant_pricing` - Versioned cost-plus pricing rows
//! - `webhook_log` - Best-effort webhook delivery log
//! - `tower_sessions` - Browser session storage (managed by tower-sessions)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p offerdesk-cli -- migrate
//! ```
//!
//! All queries use the sqlx runtime API with `FromRow` row types so the
//! crate builds without a live database.

pub mod campaigns;
pub mod carts;
pub mod counter_offers;
pub mod dashboard;
pub mod enums;
pub mod offers;
pub mod platform_sessions;
pub mod programs;
pub mod shops;
pub mod variants;
pub mod webhook_log;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use platform_sessions::PlatformSessionRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate shop domain).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
