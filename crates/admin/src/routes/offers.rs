//! Offer workflow route handlers.
//!
//! The detail page pairs each cart line with its settle price by
//! allocating the offer discount across lines; the allocation is
//! computed fresh on every view and never persisted.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use offerdesk_core::pricing::{CartAllocation, OfferLine, allocate_cart_discount};
use offerdesk_core::{OfferId, OfferStatus};

use crate::db::counter_offers::{self, CounterOfferRow, NewCounterOffer};
use crate::db::offers::{self, OfferDetail, OfferListRow};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentShop;
use crate::state::AppState;

const LIST_LIMIT: i64 = 100;

/// Query parameters for the offer list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// One status chip on the list header.
pub struct StatusCountView {
    pub status: String,
    pub count: i64,
}

/// Offer list template.
#[derive(Template, WebTemplate)]
#[template(path = "offers/list.html")]
pub struct OfferListTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub offers: Vec<OfferListRow>,
    pub status_counts: Vec<StatusCountView>,
}

/// One cart line paired with its allocated settle price.
pub struct SettleLineView {
    pub title: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub line_total: Decimal,
    pub allowance: Decimal,
    pub settle_price: Decimal,
    pub profit: Decimal,
}

/// One option in the status select.
pub struct StatusOption {
    pub value: String,
    pub selected: bool,
}

/// Offer detail template.
#[derive(Template, WebTemplate)]
#[template(path = "offers/detail.html")]
pub struct OfferDetailTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub detail: OfferDetail,
    pub counter_offers: Vec<CounterOfferRow>,
    pub settle_lines: Vec<SettleLineView>,
    pub allocation: CartAllocation,
    pub statuses: Vec<StatusOption>,
}

/// Offer listing handler.
#[instrument(skip(shop, state))]
pub async fn index(
    shop: CurrentShop,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<OfferListTemplate> {
    let active_status = query
        .status
        .as_deref()
        .map(str::parse::<OfferStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let offers = offers::list_for_shop(&state.pool, shop.shop_id, active_status, LIST_LIMIT).await?;
    let status_counts = offers::status_counts(&state.pool, shop.shop_id)
        .await?
        .into_iter()
        .map(|(status, count)| StatusCountView {
            status: status.to_string(),
            count,
        })
        .collect();

    Ok(OfferListTemplate {
        shop_domain: shop.domain,
        current_path: "/offers".to_string(),
        offers,
        status_counts,
    })
}

/// Offer detail handler.
#[instrument(skip(shop, state))]
pub async fn show(
    shop: CurrentShop,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<OfferDetailTemplate> {
    let offer_id = OfferId::new(id);
    let detail = offers::get_detail(&state.pool, shop.shop_id, offer_id).await?;
    let counters = counter_offers::list_for_offer(&state.pool, offer_id).await?;

    let lines: Vec<OfferLine> = detail
        .items
        .iter()
        .map(|item| OfferLine {
            unit_price: item.unit_price,
            unit_cost: item.unit_cost,
            quantity: item.quantity,
        })
        .collect();
    let allocation =
        allocate_cart_discount(&lines, detail.cart.cart_total, detail.offer.offer_price);

    let settle_lines = detail
        .items
        .iter()
        .zip(&allocation.lines)
        .map(|(item, alloc)| SettleLineView {
            title: item.title.clone(),
            sku: item.sku.clone(),
            quantity: item.quantity,
            line_total: alloc.line_total,
            allowance: alloc.allowance,
            settle_price: alloc.settle_price,
            profit: alloc.profit,
        })
        .collect();

    let statuses = OfferStatus::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.to_string(),
            selected: *status == detail.offer.status,
        })
        .collect();

    Ok(OfferDetailTemplate {
        shop_domain: shop.domain,
        current_path: "/offers".to_string(),
        detail,
        counter_offers: counters,
        settle_lines,
        allocation,
        statuses,
    })
}

/// Counter-offer form data.
#[derive(Debug, Deserialize)]
pub struct CounterForm {
    pub counter_price: Decimal,
    pub margin: Option<Decimal>,
    pub probability: Option<Decimal>,
    pub expected_value: Option<Decimal>,
}

/// Record a counter-offer and mark the offer countered.
#[instrument(skip(shop, state, form))]
pub async fn counter(
    shop: CurrentShop,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<CounterForm>,
) -> Result<Redirect> {
    let offer_id = OfferId::new(id);
    // Existence check scoped by shop before the insert.
    offers::get_detail(&state.pool, shop.shop_id, offer_id).await?;

    counter_offers::create(
        &state.pool,
        &NewCounterOffer {
            offer_id,
            counter_price: form.counter_price,
            margin: form.margin,
            probability: form.probability,
            expected_value: form.expected_value,
        },
    )
    .await?;

    offers::update_status(&state.pool, shop.shop_id, offer_id, OfferStatus::Countered).await?;

    Ok(Redirect::to(&format!("/offers/{id}")))
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Write a new offer status.
#[instrument(skip(shop, state))]
pub async fn set_status(
    shop: CurrentShop,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status = form
        .status
        .parse::<OfferStatus>()
        .map_err(AppError::BadRequest)?;

    offers::update_status(&state.pool, shop.shop_id, OfferId::new(id), status).await?;

    Ok(Redirect::to(&format!("/offers/{id}")))
}
