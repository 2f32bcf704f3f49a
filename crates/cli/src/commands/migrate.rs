//! Database migration command.
//!
//! Migrations are embedded at compile time from `crates/admin/migrations`
//! and applied in order; already-applied migrations are skipped.

use super::{CommandError, connect};

/// Run the admin database migrations.
///
/// # Errors
///
/// Returns [`CommandError`] if the database is unreachable or a
/// migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
