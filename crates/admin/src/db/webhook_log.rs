//! Best-effort webhook delivery log.
//!
//! Logging failures must never fail webhook processing, so [`record`]
//! swallows database errors after tracing them.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use offerdesk_core::ShopId;

use super::RepositoryError;

/// A row from the `webhook_log` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WebhookLogRow {
    pub id: i64,
    pub shop_id: Option<ShopId>,
    pub topic: String,
    pub payload_size: i32,
    pub outcome: String,
    pub received_at: DateTime<Utc>,
}

/// Record a webhook delivery. Best effort: errors are logged and dropped.
pub async fn record(
    pool: &PgPool,
    shop_id: Option<ShopId>,
    topic: &str,
    payload_size: usize,
    outcome: &str,
) {
    let size = i32::try_from(payload_size).unwrap_or(i32::MAX);
    let result = sqlx::query(
        "INSERT INTO webhook_log (shop_id, topic, payload_size, outcome) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(shop_id)
    .bind(topic)
    .bind(size)
    .bind(outcome)
    .execute(pool)
    .await;

    if let Err(err) = result {
        tracing::warn!(topic, %err, "failed to record webhook delivery");
    }
}

/// List the most recent webhook deliveries for a shop.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn list_recent(
    pool: &PgPool,
    shop_id: ShopId,
    limit: i64,
) -> Result<Vec<WebhookLogRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, WebhookLogRow>(
        "SELECT id, shop_id, topic, payload_size, outcome, received_at \
         FROM webhook_log WHERE shop_id = $1 \
         ORDER BY received_at DESC LIMIT $2",
    )
    .bind(shop_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
