//! Variant and versioned pricing query helpers.
//!
//! The current pricing row for a variant is selected by the forward
//! `current_pricing_id` pointer on the variant row, not by
//! `max(version)`. New pricing is a two-step write: insert the version,
//! then repoint the variant, inside one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use offerdesk_core::pricing::{Allowances, PricingComponents};
use offerdesk_core::{ShopId, VariantId, VariantPricingId};

use super::RepositoryError;

/// A row from the `variants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantRow {
    pub id: VariantId,
    pub shop_id: ShopId,
    /// The platform's numeric product id.
    pub platform_product_id: i64,
    /// The platform's numeric variant id.
    pub platform_variant_id: i64,
    pub sku: Option<String>,
    pub title: String,
    /// Forward pointer to the current `variant_pricing` row.
    pub current_pricing_id: Option<VariantPricingId>,
}

/// A row from the `variant_pricing` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantPricingRow {
    pub id: VariantPricingId,
    pub variant_id: VariantId,
    pub version: i32,
    pub cost: Decimal,
    pub profit_markup: Decimal,
    pub discount_allowance: Decimal,
    pub shrink_allowance: Decimal,
    pub financing_allowance: Decimal,
    pub shipping_allowance: Decimal,
    pub market_adjustment: Decimal,
    pub selling_price: Decimal,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl VariantPricingRow {
    /// View the row as pure pricing components.
    #[must_use]
    pub const fn components(&self) -> PricingComponents {
        PricingComponents {
            cost: self.cost,
            profit_markup: self.profit_markup,
            allowances: Allowances {
                discount: self.discount_allowance,
                shrink: self.shrink_allowance,
                financing: self.financing_allowance,
                shipping: self.shipping_allowance,
            },
            market_adjustment: self.market_adjustment,
        }
    }
}

/// A variant joined with its current pricing row (if any).
#[derive(Debug, Clone)]
pub struct VariantWithPricing {
    pub variant: VariantRow,
    pub pricing: Option<VariantPricingRow>,
}

/// List a shop's variants with their current pricing, by SKU order.
///
/// The join follows `variants.current_pricing_id` (see module docs).
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn list_with_current_pricing(
    pool: &PgPool,
    shop_id: ShopId,
) -> Result<Vec<VariantWithPricing>, RepositoryError> {
    #[derive(sqlx::FromRow)]
    struct JoinedRow {
        id: VariantId,
        shop_id: ShopId,
        platform_product_id: i64,
        platform_variant_id: i64,
        sku: Option<String>,
        title: String,
        current_pricing_id: Option<VariantPricingId>,
        pricing_id: Option<VariantPricingId>,
        version: Option<i32>,
        cost: Option<Decimal>,
        profit_markup: Option<Decimal>,
        discount_allowance: Option<Decimal>,
        shrink_allowance: Option<Decimal>,
        financing_allowance: Option<Decimal>,
        shipping_allowance: Option<Decimal>,
        market_adjustment: Option<Decimal>,
        selling_price: Option<Decimal>,
        published: Option<bool>,
        published_at: Option<DateTime<Utc>>,
    }

    let rows = sqlx::query_as::<_, JoinedRow>(
        "SELECT v.id, v.shop_id, v.platform_product_id, v.platform_variant_id, \
                v.sku, v.title, v.current_pricing_id, \
                p.id AS pricing_id, p.version, p.cost, p.profit_markup, \
                p.discount_allowance, p.shrink_allowance, p.financing_allowance, \
                p.shipping_allowance, p.market_adjustment, p.selling_price, \
                p.published, p.published_at \
         FROM variants v \
         LEFT JOIN variant_pricing p ON p.id = v.current_pricing_id \
         WHERE v.shop_id = $1 \
         ORDER BY v.sku NULLS LAST, v.id",
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    let result = rows
        .into_iter()
        .map(|row| {
            let pricing = match (row.pricing_id, row.version) {
                (Some(id), Some(version)) => Some(VariantPricingRow {
                    id,
                    variant_id: row.id,
                    version,
                    cost: row.cost.unwrap_or_default(),
                    profit_markup: row.profit_markup.unwrap_or_default(),
                    discount_allowance: row.discount_allowance.unwrap_or_default(),
                    shrink_allowance: row.shrink_allowance.unwrap_or_default(),
                    financing_allowance: row.financing_allowance.unwrap_or_default(),
                    shipping_allowance: row.shipping_allowance.unwrap_or_default(),
                    market_adjustment: row.market_adjustment.unwrap_or_default(),
                    selling_price: row.selling_price.unwrap_or_default(),
                    published: row.published.unwrap_or(false),
                    published_at: row.published_at,
                }),
                _ => None,
            };

            VariantWithPricing {
                variant: VariantRow {
                    id: row.id,
                    shop_id: row.shop_id,
                    platform_product_id: row.platform_product_id,
                    platform_variant_id: row.platform_variant_id,
                    sku: row.sku,
                    title: row.title,
                    current_pricing_id: row.current_pricing_id,
                },
                pricing,
            }
        })
        .collect();

    Ok(result)
}

/// Fetch a single variant by its platform variant id.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn find_by_platform_id(
    pool: &PgPool,
    shop_id: ShopId,
    platform_variant_id: i64,
) -> Result<Option<VariantRow>, RepositoryError> {
    let row = sqlx::query_as::<_, VariantRow>(
        "SELECT id, shop_id, platform_product_id, platform_variant_id, sku, title, \
                current_pricing_id \
         FROM variants WHERE shop_id = $1 AND platform_variant_id = $2",
    )
    .bind(shop_id)
    .bind(platform_variant_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upsert a variant from a product webhook payload.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the upsert fails.
pub async fn upsert_variant(
    pool: &PgPool,
    shop_id: ShopId,
    platform_product_id: i64,
    platform_variant_id: i64,
    sku: Option<&str>,
    title: &str,
) -> Result<VariantId, RepositoryError> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO variants (shop_id, platform_product_id, platform_variant_id, sku, title) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (shop_id, platform_variant_id) DO UPDATE SET \
             platform_product_id = EXCLUDED.platform_product_id, \
             sku = EXCLUDED.sku, \
             title = EXCLUDED.title, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(shop_id)
    .bind(platform_product_id)
    .bind(platform_variant_id)
    .bind(sku)
    .bind(title)
    .fetch_one(pool)
    .await?;

    Ok(VariantId::new(id))
}

/// Insert a new pricing version for a variant and repoint
/// `current_pricing_id` at it, in one transaction.
///
/// Returns the new pricing row id.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if either statement fails; the
/// transaction rolls back and the old pointer stays valid.
pub async fn insert_pricing_version(
    pool: &PgPool,
    variant_id: VariantId,
    components: &PricingComponents,
) -> Result<VariantPricingId, RepositoryError> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO variant_pricing \
             (variant_id, version, cost, profit_markup, discount_allowance, \
              shrink_allowance, financing_allowance, shipping_allowance, \
              market_adjustment, selling_price) \
         SELECT $1, COALESCE(MAX(version), 0) + 1, $2, $3, $4, $5, $6, $7, $8, $9 \
         FROM variant_pricing WHERE variant_id = $1 \
         RETURNING id",
    )
    .bind(variant_id)
    .bind(components.cost)
    .bind(components.profit_markup)
    .bind(components.allowances.discount)
    .bind(components.allowances.shrink)
    .bind(components.allowances.financing)
    .bind(components.allowances.shipping)
    .bind(components.market_adjustment)
    .bind(components.selling_price())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE variants SET current_pricing_id = $2, updated_at = NOW() WHERE id = $1")
        .bind(variant_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(VariantPricingId::new(id))
}

/// Mark a pricing row as published.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the pricing row does not
/// exist.
pub async fn mark_published(
    pool: &PgPool,
    pricing_id: VariantPricingId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE variant_pricing SET published = TRUE, published_at = NOW() WHERE id = $1",
    )
    .bind(pricing_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
