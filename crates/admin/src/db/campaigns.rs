//! Campaign query helpers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use offerdesk_core::{CampaignId, ShopId};

use super::RepositoryError;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: CampaignId,
    pub shop_id: ShopId,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub budget: Option<Decimal>,
    /// Free-form goal list (JSON array of strings).
    pub goals: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a campaign.
#[derive(Debug, Clone)]
pub struct CampaignInput {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub budget: Option<Decimal>,
    pub goals: JsonValue,
}

/// List campaigns for a shop, newest first.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn list_for_shop(
    pool: &PgPool,
    shop_id: ShopId,
) -> Result<Vec<CampaignRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, CampaignRow>(
        "SELECT id, shop_id, name, starts_on, ends_on, budget, goals, created_at \
         FROM campaigns WHERE shop_id = $1 ORDER BY starts_on DESC",
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch a campaign by id.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the campaign does not exist
/// for this shop.
pub async fn get(
    pool: &PgPool,
    shop_id: ShopId,
    campaign_id: CampaignId,
) -> Result<CampaignRow, RepositoryError> {
    sqlx::query_as::<_, CampaignRow>(
        "SELECT id, shop_id, name, starts_on, ends_on, budget, goals, created_at \
         FROM campaigns WHERE id = $1 AND shop_id = $2",
    )
    .bind(campaign_id)
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Insert a campaign and return its id.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the insert fails.
pub async fn create(
    pool: &PgPool,
    shop_id: ShopId,
    input: &CampaignInput,
) -> Result<CampaignId, RepositoryError> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO campaigns (shop_id, name, starts_on, ends_on, budget, goals) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(shop_id)
    .bind(&input.name)
    .bind(input.starts_on)
    .bind(input.ends_on)
    .bind(input.budget)
    .bind(&input.goals)
    .fetch_one(pool)
    .await?;

    Ok(CampaignId::new(id))
}

/// Update a campaign in place.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the campaign does not exist
/// for this shop.
pub async fn update(
    pool: &PgPool,
    shop_id: ShopId,
    campaign_id: CampaignId,
    input: &CampaignInput,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE campaigns \
         SET name = $3, starts_on = $4, ends_on = $5, budget = $6, goals = $7, updated_at = NOW() \
         WHERE id = $1 AND shop_id = $2",
    )
    .bind(campaign_id)
    .bind(shop_id)
    .bind(&input.name)
    .bind(input.starts_on)
    .bind(input.ends_on)
    .bind(input.budget)
    .bind(&input.goals)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
