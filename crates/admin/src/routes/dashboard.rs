//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::dashboard::{self, DashboardTotals};
use crate::error::Result;
use crate::filters;
use crate::middleware::CurrentShop;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub totals: DashboardTotals,
}

/// Dashboard page handler.
#[instrument(skip(shop, state))]
pub async fn index(shop: CurrentShop, State(state): State<AppState>) -> Result<DashboardTemplate> {
    let totals = dashboard::totals(&state.pool, shop.shop_id).await?;

    Ok(DashboardTemplate {
        shop_domain: shop.domain,
        current_path: "/".to_string(),
        totals,
    })
}
