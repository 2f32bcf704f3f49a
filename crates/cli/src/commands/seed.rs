//! Development seed data.
//!
//! Idempotent-ish: reruns upsert the shop and add another round of
//! sample variants, carts, and offers.

use offerdesk_core::types::{CartStatus, OfferStatus, ProgramFocus};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{CommandError, connect};

/// Seed a development shop with sample data.
///
/// # Errors
///
/// Returns [`CommandError`] if any insert fails.
pub async fn run(shop_domain: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let shop_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO shops (domain, name) VALUES ($1, $2) \
         ON CONFLICT (domain) DO UPDATE SET uninstalled_at = NULL \
         RETURNING id",
    )
    .bind(shop_domain)
    .bind("Development Shop")
    .fetch_one(&pool)
    .await?;

    let campaign_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO campaigns (shop_id, name, starts_on, budget, goals) \
         VALUES ($1, 'Spring Clearance', CURRENT_DATE, 5000, \
                 '[\"Clear winter stock\", \"Grow repeat buyers\"]') \
         RETURNING id",
    )
    .bind(shop_id)
    .fetch_one(&pool)
    .await?;

    sqlx::query(
        "INSERT INTO programs (campaign_id, name, focus, accept_rate, decline_rate, expiry_minutes) \
         VALUES ($1, 'Default clearance', $2, 0.9, 0.5, 1440)",
    )
    .bind(campaign_id)
    .bind(ProgramFocus::Clearance)
    .execute(&pool)
    .await?;

    let samples: [(&str, &str, &str, &str); 3] = [
        ("SEED-001", "Canvas Tote", "12.00", "29.95"),
        ("SEED-002", "Enamel Mug", "4.50", "14.00"),
        ("SEED-003", "Wool Throw", "38.00", "89.00"),
    ];

    for (i, (sku, title, cost, price)) in samples.iter().enumerate() {
        let platform_id = 900_000 + i64::try_from(i).unwrap_or(0);
        seed_variant(&pool, shop_id, platform_id, sku, title, cost, price).await?;
    }

    let consumer_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO consumers (shop_id, email, display_name) \
         VALUES ($1, 'shopper@example.test', 'Sample Shopper') \
         ON CONFLICT (shop_id, email) WHERE email IS NOT NULL \
         DO UPDATE SET display_name = EXCLUDED.display_name \
         RETURNING id",
    )
    .bind(shop_id)
    .fetch_one(&pool)
    .await?;

    let cart_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO carts (shop_id, consumer_id, platform_cart_token, status, item_count, cart_total) \
         VALUES ($1, $2, 'seed-cart-token', $3, 2, 43.95) \
         ON CONFLICT (shop_id, platform_cart_token) DO UPDATE SET updated_at = NOW() \
         RETURNING id",
    )
    .bind(shop_id)
    .bind(consumer_id)
    .bind(CartStatus::Offered)
    .fetch_one(&pool)
    .await?;

    sqlx::query("SELECT upsert_cart_item($1, $2, $3, $4, $5, $6)")
        .bind(cart_id)
        .bind(900_000_i64)
        .bind("Canvas Tote")
        .bind("SEED-001")
        .bind(1)
        .bind(parse_decimal("29.95"))
        .execute(&pool)
        .await?;
    sqlx::query("SELECT upsert_cart_item($1, $2, $3, $4, $5, $6)")
        .bind(cart_id)
        .bind(900_001_i64)
        .bind("Enamel Mug")
        .bind("SEED-002")
        .bind(1)
        .bind(parse_decimal("14.00"))
        .execute(&pool)
        .await?;

    sqlx::query(
        "INSERT INTO offers (shop_id, cart_id, consumer_id, campaign_id, offer_price, status) \
         VALUES ($1, $2, $3, $4, 35.00, $5)",
    )
    .bind(shop_id)
    .bind(cart_id)
    .bind(consumer_id)
    .bind(campaign_id)
    .bind(OfferStatus::Pending)
    .execute(&pool)
    .await?;

    println!("Seeded shop {shop_domain} (id {shop_id})");
    Ok(())
}

fn parse_decimal(s: &str) -> Decimal {
    s.parse().unwrap_or_default()
}

/// Insert a variant plus its first pricing version and repoint the
/// variant at it.
async fn seed_variant(
    pool: &PgPool,
    shop_id: i32,
    platform_variant_id: i64,
    sku: &str,
    title: &str,
    cost: &str,
    price: &str,
) -> Result<(), CommandError> {
    let cost = parse_decimal(cost);
    let price = parse_decimal(price);
    let markup = price - cost;

    let variant_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO variants (shop_id, platform_product_id, platform_variant_id, sku, title) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (shop_id, platform_variant_id) DO UPDATE SET title = EXCLUDED.title \
         RETURNING id",
    )
    .bind(shop_id)
    .bind(platform_variant_id)
    .bind(platform_variant_id)
    .bind(sku)
    .bind(title)
    .fetch_one(pool)
    .await?;

    let pricing_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO variant_pricing \
             (variant_id, version, cost, profit_markup, selling_price, published) \
         SELECT $1, COALESCE(MAX(version), 0) + 1, $2, $3, $4, TRUE \
         FROM variant_pricing WHERE variant_id = $1 \
         RETURNING id",
    )
    .bind(variant_id)
    .bind(cost)
    .bind(markup)
    .bind(price)
    .fetch_one(pool)
    .await?;

    sqlx::query("UPDATE variants SET current_pricing_id = $2 WHERE id = $1")
        .bind(variant_id)
        .bind(pricing_id)
        .execute(pool)
        .await?;

    Ok(())
}
