//! Counter-offer query helpers.
//!
//! Margin, probability, and expected-value fields are computed by the
//! caller (or upstream tooling) and stored as-is; nothing here derives
//! them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use offerdesk_core::{CounterOfferId, OfferId};

use super::RepositoryError;

/// A row from the `counter_offers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CounterOfferRow {
    pub id: CounterOfferId,
    pub offer_id: OfferId,
    /// The merchant's alternative price.
    pub counter_price: Decimal,
    pub margin: Option<Decimal>,
    pub probability: Option<Decimal>,
    pub expected_value: Option<Decimal>,
    /// Free-form workflow status string.
    pub status: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a counter-offer.
#[derive(Debug, Clone)]
pub struct NewCounterOffer {
    pub offer_id: OfferId,
    pub counter_price: Decimal,
    pub margin: Option<Decimal>,
    pub probability: Option<Decimal>,
    pub expected_value: Option<Decimal>,
}

/// List counter-offers for an offer, newest first.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn list_for_offer(
    pool: &PgPool,
    offer_id: OfferId,
) -> Result<Vec<CounterOfferRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, CounterOfferRow>(
        "SELECT id, offer_id, counter_price, margin, probability, expected_value, \
                status, approved, created_at \
         FROM counter_offers WHERE offer_id = $1 ORDER BY created_at DESC",
    )
    .bind(offer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a counter-offer and return its id.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the insert fails.
pub async fn create(
    pool: &PgPool,
    counter: &NewCounterOffer,
) -> Result<CounterOfferId, RepositoryError> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO counter_offers \
             (offer_id, counter_price, margin, probability, expected_value, status) \
         VALUES ($1, $2, $3, $4, $5, 'proposed') \
         RETURNING id",
    )
    .bind(counter.offer_id)
    .bind(counter.counter_price)
    .bind(counter.margin)
    .bind(counter.probability)
    .bind(counter.expected_value)
    .fetch_one(pool)
    .await?;

    Ok(CounterOfferId::new(id))
}

/// Flag a counter-offer as approved.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the counter-offer does not
/// exist.
pub async fn approve(
    pool: &PgPool,
    counter_offer_id: CounterOfferId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE counter_offers SET approved = TRUE, status = 'approved' WHERE id = $1",
    )
    .bind(counter_offer_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
