//! Offer query helpers.
//!
//! Offers reference a cart, consumer, program, and campaign. The
//! application layer reads and writes status values without validating
//! lifecycle transitions; those live in the database layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use offerdesk_core::{
    CampaignId, CartId, ConsumerId, OfferId, OfferStatus, ProgramId, ShopId,
};

use super::RepositoryError;
use super::carts::{CartItemRow, CartRow};

/// A row from the `offers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfferRow {
    pub id: OfferId,
    pub shop_id: ShopId,
    pub cart_id: CartId,
    pub consumer_id: ConsumerId,
    pub program_id: Option<ProgramId>,
    pub campaign_id: Option<CampaignId>,
    /// The consumer's proposed price for the whole cart.
    pub offer_price: Decimal,
    pub status: OfferStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `consumers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConsumerRow {
    pub id: ConsumerId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An offer joined with its cart total and consumer name for list views.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfferListRow {
    pub id: OfferId,
    pub offer_price: Decimal,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub cart_total: Decimal,
    pub consumer_name: Option<String>,
}

/// Full offer detail: the offer plus its cart, items, and consumer.
#[derive(Debug, Clone)]
pub struct OfferDetail {
    pub offer: OfferRow,
    pub cart: CartRow,
    pub items: Vec<CartItemRow>,
    pub consumer: ConsumerRow,
}

/// List offers for a shop, newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn list_for_shop(
    pool: &PgPool,
    shop_id: ShopId,
    status: Option<OfferStatus>,
    limit: i64,
) -> Result<Vec<OfferListRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, OfferListRow>(
        "SELECT o.id, o.offer_price, o.status, o.created_at, o.expires_at, \
                c.cart_total, con.display_name AS consumer_name \
         FROM offers o \
         JOIN carts c ON c.id = o.cart_id \
         JOIN consumers con ON con.id = o.consumer_id \
         WHERE o.shop_id = $1 AND ($2::offer_status IS NULL OR o.status = $2) \
         ORDER BY o.created_at DESC \
         LIMIT $3",
    )
    .bind(shop_id)
    .bind(status)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one offer with its cart, line items, and consumer.
///
/// Three sequential round trips; the offer row scopes the rest.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the offer does not exist for
/// this shop, or [`RepositoryError::DataCorruption`] if its cart or
/// consumer row is missing.
pub async fn get_detail(
    pool: &PgPool,
    shop_id: ShopId,
    offer_id: OfferId,
) -> Result<OfferDetail, RepositoryError> {
    let offer = sqlx::query_as::<_, OfferRow>(
        "SELECT id, shop_id, cart_id, consumer_id, program_id, campaign_id, \
                offer_price, status, expires_at, created_at \
         FROM offers WHERE id = $1 AND shop_id = $2",
    )
    .bind(offer_id)
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    let cart = sqlx::query_as::<_, CartRow>(
        "SELECT id, shop_id, consumer_id, platform_cart_token, status, \
                item_count, cart_total, created_at \
         FROM carts WHERE id = $1",
    )
    .bind(offer.cart_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        RepositoryError::DataCorruption(format!("offer {} references missing cart", offer.id))
    })?;

    let items = sqlx::query_as::<_, CartItemRow>(
        "SELECT id, cart_id, variant_id, title, sku, quantity, unit_price, unit_cost \
         FROM cart_items WHERE cart_id = $1 ORDER BY id",
    )
    .bind(offer.cart_id)
    .fetch_all(pool)
    .await?;

    let consumer = sqlx::query_as::<_, ConsumerRow>(
        "SELECT id, email, display_name, created_at FROM consumers WHERE id = $1",
    )
    .bind(offer.consumer_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        RepositoryError::DataCorruption(format!("offer {} references missing consumer", offer.id))
    })?;

    Ok(OfferDetail {
        offer,
        cart,
        items,
        consumer,
    })
}

/// Write a new status for an offer.
///
/// No transition validation happens here; the caller writes whatever
/// status the workflow produced.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the offer does not exist for
/// this shop.
pub async fn update_status(
    pool: &PgPool,
    shop_id: ShopId,
    offer_id: OfferId,
    status: OfferStatus,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE offers SET status = $3, updated_at = NOW() WHERE id = $1 AND shop_id = $2",
    )
    .bind(offer_id)
    .bind(shop_id)
    .bind(status)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Count offers per status for a shop (offers list header chips).
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn status_counts(
    pool: &PgPool,
    shop_id: ShopId,
) -> Result<Vec<(OfferStatus, i64)>, RepositoryError> {
    let rows = sqlx::query_as::<_, (OfferStatus, i64)>(
        "SELECT status, COUNT(*) FROM offers WHERE shop_id = $1 GROUP BY status",
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
