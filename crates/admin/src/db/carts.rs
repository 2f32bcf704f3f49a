//! Cart and cart item query helpers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use offerdesk_core::{CartId, CartItemId, CartStatus, ConsumerId, ShopId, VariantId};

use super::RepositoryError;

/// A row from the `carts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartRow {
    pub id: CartId,
    pub shop_id: ShopId,
    pub consumer_id: Option<ConsumerId>,
    /// The platform's opaque cart/checkout token.
    pub platform_cart_token: String,
    pub status: CartStatus,
    pub item_count: i32,
    pub cart_total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A row from the `cart_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItemRow {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub variant_id: Option<VariantId>,
    pub title: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Unit cost snapshot taken when the item was synced; zero when the
    /// variant had no pricing row at sync time.
    pub unit_cost: Decimal,
}

/// Fetch a cart with its items.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if the cart does not exist for
/// this shop.
pub async fn get_with_items(
    pool: &PgPool,
    shop_id: ShopId,
    cart_id: CartId,
) -> Result<(CartRow, Vec<CartItemRow>), RepositoryError> {
    let cart = sqlx::query_as::<_, CartRow>(
        "SELECT id, shop_id, consumer_id, platform_cart_token, status, \
                item_count, cart_total, created_at \
         FROM carts WHERE id = $1 AND shop_id = $2",
    )
    .bind(cart_id)
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    let items = sqlx::query_as::<_, CartItemRow>(
        "SELECT id, cart_id, variant_id, title, sku, quantity, unit_price, unit_cost \
         FROM cart_items WHERE cart_id = $1 ORDER BY id",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;

    Ok((cart, items))
}

/// List carts for a shop filtered by status, newest first.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn list_by_status(
    pool: &PgPool,
    shop_id: ShopId,
    status: CartStatus,
    limit: i64,
) -> Result<Vec<CartRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, CartRow>(
        "SELECT id, shop_id, consumer_id, platform_cart_token, status, \
                item_count, cart_total, created_at \
         FROM carts WHERE shop_id = $1 AND status = $2 \
         ORDER BY created_at DESC LIMIT $3",
    )
    .bind(shop_id)
    .bind(status)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Upsert a cart header from an order/checkout webhook payload via the
/// `upsert_cart_from_order` stored procedure.
///
/// Returns the internal cart id.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the call fails.
pub async fn upsert_from_order(
    pool: &PgPool,
    shop_id: ShopId,
    platform_cart_token: &str,
    consumer_email: Option<&str>,
    status: CartStatus,
    item_count: i32,
    cart_total: Decimal,
) -> Result<CartId, RepositoryError> {
    let id = sqlx::query_scalar::<_, i32>(
        "SELECT upsert_cart_from_order($1, $2, $3, $4, $5, $6)",
    )
    .bind(shop_id)
    .bind(platform_cart_token)
    .bind(consumer_email)
    .bind(status)
    .bind(item_count)
    .bind(cart_total)
    .fetch_one(pool)
    .await?;

    Ok(CartId::new(id))
}

/// Upsert a single cart line via the `upsert_cart_item` stored procedure.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the call fails.
pub async fn upsert_item(
    pool: &PgPool,
    cart_id: CartId,
    platform_variant_id: Option<i64>,
    title: &str,
    sku: Option<&str>,
    quantity: i32,
    unit_price: Decimal,
) -> Result<(), RepositoryError> {
    sqlx::query("SELECT upsert_cart_item($1, $2, $3, $4, $5, $6)")
        .bind(cart_id)
        .bind(platform_variant_id)
        .bind(title)
        .bind(sku)
        .bind(quantity)
        .bind(unit_price)
        .execute(pool)
        .await?;

    Ok(())
}
