//! Program query helpers.
//!
//! Programs belong to a campaign and carry the auto-evaluation knobs:
//! focus, accept/decline rate thresholds, and the offer expiry window.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use offerdesk_core::{CampaignId, ProgramFocus, ProgramId, ShopId};

use super::RepositoryError;

/// A row from the `programs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgramRow {
    pub id: ProgramId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub focus: ProgramFocus,
    /// Offers at or above this fraction of cart total auto-accept.
    pub accept_rate: Decimal,
    /// Offers below this fraction of cart total auto-decline.
    pub decline_rate: Decimal,
    /// Minutes before an unresolved offer expires.
    pub expiry_minutes: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a program.
#[derive(Debug, Clone)]
pub struct ProgramInput {
    pub name: String,
    pub focus: ProgramFocus,
    pub accept_rate: Decimal,
    pub decline_rate: Decimal,
    pub expiry_minutes: i32,
}

/// List programs for a campaign.
///
/// The join through `campaigns` keeps tenant scoping intact.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn list_by_campaign(
    pool: &PgPool,
    shop_id: ShopId,
    campaign_id: CampaignId,
) -> Result<Vec<ProgramRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProgramRow>(
        "SELECT p.id, p.campaign_id, p.name, p.focus, p.accept_rate, p.decline_rate, \
                p.expiry_minutes, p.created_at \
         FROM programs p \
         JOIN campaigns c ON c.id = p.campaign_id \
         WHERE p.campaign_id = $1 AND c.shop_id = $2 \
         ORDER BY p.created_at",
    )
    .bind(campaign_id)
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch a program by id, scoped by shop.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the program does not exist
/// for this shop.
pub async fn get(
    pool: &PgPool,
    shop_id: ShopId,
    program_id: ProgramId,
) -> Result<ProgramRow, RepositoryError> {
    sqlx::query_as::<_, ProgramRow>(
        "SELECT p.id, p.campaign_id, p.name, p.focus, p.accept_rate, p.decline_rate, \
                p.expiry_minutes, p.created_at \
         FROM programs p \
         JOIN campaigns c ON c.id = p.campaign_id \
         WHERE p.id = $1 AND c.shop_id = $2",
    )
    .bind(program_id)
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Insert a program under a campaign and return its id.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the campaign does not belong
/// to this shop.
pub async fn create(
    pool: &PgPool,
    shop_id: ShopId,
    campaign_id: CampaignId,
    input: &ProgramInput,
) -> Result<ProgramId, RepositoryError> {
    // Scope check first; the insert itself has no shop column.
    super::campaigns::get(pool, shop_id, campaign_id).await?;

    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO programs (campaign_id, name, focus, accept_rate, decline_rate, expiry_minutes) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(campaign_id)
    .bind(&input.name)
    .bind(input.focus)
    .bind(input.accept_rate)
    .bind(input.decline_rate)
    .bind(input.expiry_minutes)
    .fetch_one(pool)
    .await?;

    Ok(ProgramId::new(id))
}

/// Update a program in place.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the program does not exist
/// for this shop.
pub async fn update(
    pool: &PgPool,
    shop_id: ShopId,
    program_id: ProgramId,
    input: &ProgramInput,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE programs p \
         SET name = $3, focus = $4, accept_rate = $5, decline_rate = $6, \
             expiry_minutes = $7, updated_at = NOW() \
         FROM campaigns c \
         WHERE p.id = $1 AND p.campaign_id = c.id AND c.shop_id = $2",
    )
    .bind(program_id)
    .bind(shop_id)
    .bind(&input.name)
    .bind(input.focus)
    .bind(input.accept_rate)
    .bind(input.decline_rate)
    .bind(input.expiry_minutes)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
