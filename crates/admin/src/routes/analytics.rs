//! Analytics route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use offerdesk_core::OfferStatus;

use crate::db::offers;
use crate::db::webhook_log::{self, WebhookLogRow};
use crate::error::Result;
use crate::filters;
use crate::middleware::CurrentShop;
use crate::state::AppState;

const WEBHOOK_LOG_LIMIT: i64 = 50;

/// One row of the offer funnel.
pub struct FunnelRow {
    pub status: OfferStatus,
    pub count: i64,
}

/// Analytics template.
#[derive(Template, WebTemplate)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub funnel: Vec<FunnelRow>,
    pub total_offers: i64,
    pub webhook_log: Vec<WebhookLogRow>,
}

/// Analytics page handler.
#[instrument(skip(shop, state))]
pub async fn index(shop: CurrentShop, State(state): State<AppState>) -> Result<AnalyticsTemplate> {
    let counts = offers::status_counts(&state.pool, shop.shop_id).await?;
    let webhook_log =
        webhook_log::list_recent(&state.pool, shop.shop_id, WEBHOOK_LOG_LIMIT).await?;

    // Render the funnel in declaration order, including empty statuses.
    let funnel: Vec<FunnelRow> = OfferStatus::ALL
        .iter()
        .map(|status| FunnelRow {
            status: *status,
            count: counts
                .iter()
                .find(|(s, _)| s == status)
                .map_or(0, |(_, n)| *n),
        })
        .collect();
    let total_offers = funnel.iter().map(|row| row.count).sum();

    Ok(AnalyticsTemplate {
        shop_domain: shop.domain,
        current_path: "/analytics".to_string(),
        funnel,
        total_offers,
        webhook_log,
    })
}
