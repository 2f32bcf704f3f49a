//! Campaign route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use offerdesk_core::CampaignId;

use crate::db::campaigns::{self, CampaignInput, CampaignRow};
use crate::db::programs::{self, ProgramRow};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentShop;
use crate::state::AppState;

/// Campaign list template.
#[derive(Template, WebTemplate)]
#[template(path = "campaigns/list.html")]
pub struct CampaignListTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub campaigns: Vec<CampaignRow>,
}

/// Campaign detail template.
#[derive(Template, WebTemplate)]
#[template(path = "campaigns/detail.html")]
pub struct CampaignDetailTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub campaign: CampaignRow,
    pub programs: Vec<ProgramRow>,
    pub goals: Vec<String>,
    pub focus_values: Vec<String>,
}

/// Campaign form data, shared by create and update.
#[derive(Debug, Deserialize)]
pub struct CampaignForm {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub budget: Option<Decimal>,
    /// Newline-separated goal list.
    pub goals: Option<String>,
}

impl CampaignForm {
    fn into_input(self) -> Result<CampaignInput> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Campaign name is required".into()));
        }
        if let Some(ends_on) = self.ends_on
            && ends_on < self.starts_on
        {
            return Err(AppError::BadRequest(
                "Campaign end date is before its start date".into(),
            ));
        }

        let goals: Vec<String> = self
            .goals
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(CampaignInput {
            name: self.name.trim().to_string(),
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            budget: self.budget,
            goals: serde_json::json!(goals),
        })
    }
}

/// Campaign listing handler.
#[instrument(skip(shop, state))]
pub async fn index(
    shop: CurrentShop,
    State(state): State<AppState>,
) -> Result<CampaignListTemplate> {
    let campaigns = campaigns::list_for_shop(&state.pool, shop.shop_id).await?;

    Ok(CampaignListTemplate {
        shop_domain: shop.domain,
        current_path: "/campaigns".to_string(),
        campaigns,
    })
}

/// Campaign detail handler.
#[instrument(skip(shop, state))]
pub async fn show(
    shop: CurrentShop,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<CampaignDetailTemplate> {
    let campaign_id = CampaignId::new(id);
    let campaign = campaigns::get(&state.pool, shop.shop_id, campaign_id).await?;
    let programs = programs::list_by_campaign(&state.pool, shop.shop_id, campaign_id).await?;

    let goals: Vec<String> = campaign
        .goals
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();

    let focus_values = state
        .enum_cache
        .fetch()
        .await?
        .get("program_focus")
        .cloned()
        .unwrap_or_default();

    Ok(CampaignDetailTemplate {
        shop_domain: shop.domain,
        current_path: "/campaigns".to_string(),
        campaign,
        programs,
        goals,
        focus_values,
    })
}

/// Create a campaign.
#[instrument(skip(shop, state, form))]
pub async fn create(
    shop: CurrentShop,
    State(state): State<AppState>,
    Form(form): Form<CampaignForm>,
) -> Result<Redirect> {
    let input = form.into_input()?;
    let id = campaigns::create(&state.pool, shop.shop_id, &input).await?;

    Ok(Redirect::to(&format!("/campaigns/{id}")))
}

/// Update a campaign.
#[instrument(skip(shop, state, form))]
pub async fn update(
    shop: CurrentShop,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<CampaignForm>,
) -> Result<Redirect> {
    let input = form.into_input()?;
    campaigns::update(&state.pool, shop.shop_id, CampaignId::new(id), &input).await?;

    Ok(Redirect::to(&format!("/campaigns/{id}")))
}
