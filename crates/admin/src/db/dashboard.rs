//! Dashboard aggregate queries.
//!
//! The totals come from the `dashboard_totals` stored procedure so the
//! page is a single round trip.

use rust_decimal::Decimal;
use sqlx::PgPool;

use offerdesk_core::ShopId;

use super::RepositoryError;

/// Aggregates returned by `dashboard_totals`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DashboardTotals {
    pub open_offers: i64,
    pub accepted_offers: i64,
    pub declined_offers: i64,
    pub countered_offers: i64,
    pub carts_offered: i64,
    pub carts_closed_won: i64,
    pub offered_revenue: Decimal,
    pub won_revenue: Decimal,
}

/// Fetch dashboard totals for a shop.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the call fails.
pub async fn totals(pool: &PgPool, shop_id: ShopId) -> Result<DashboardTotals, RepositoryError> {
    let totals = sqlx::query_as::<_, DashboardTotals>("SELECT * FROM dashboard_totals($1)")
        .bind(shop_id)
        .fetch_one(pool)
        .await?;

    Ok(totals)
}
