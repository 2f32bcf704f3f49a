//! Program route handlers.
//!
//! Programs carry the auto-evaluation knobs for incoming offers: focus,
//! accept/decline thresholds, and the expiry window.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use offerdesk_core::{CampaignId, ProgramFocus, ProgramId};

use crate::db::campaigns::{self, CampaignRow};
use crate::db::programs::{self, ProgramInput, ProgramRow};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentShop;
use crate::state::AppState;

/// Program list template.
#[derive(Template, WebTemplate)]
#[template(path = "programs/list.html")]
pub struct ProgramListTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub campaign: CampaignRow,
    pub programs: Vec<ProgramRow>,
    pub focus_values: Vec<String>,
}

/// Program form data, shared by create and update.
#[derive(Debug, Deserialize)]
pub struct ProgramForm {
    pub campaign_id: i32,
    pub name: String,
    pub focus: String,
    pub accept_rate: Decimal,
    pub decline_rate: Decimal,
    pub expiry_minutes: i32,
}

impl ProgramForm {
    fn into_input(self) -> Result<(CampaignId, ProgramInput)> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Program name is required".into()));
        }
        let focus = self
            .focus
            .parse::<ProgramFocus>()
            .map_err(AppError::BadRequest)?;
        if self.decline_rate > self.accept_rate {
            return Err(AppError::BadRequest(
                "Decline threshold cannot exceed the accept threshold".into(),
            ));
        }
        if self.expiry_minutes <= 0 {
            return Err(AppError::BadRequest("Expiry must be positive".into()));
        }

        Ok((
            CampaignId::new(self.campaign_id),
            ProgramInput {
                name: self.name.trim().to_string(),
                focus,
                accept_rate: self.accept_rate,
                decline_rate: self.decline_rate,
                expiry_minutes: self.expiry_minutes,
            },
        ))
    }
}

/// Program listing for a campaign.
#[instrument(skip(shop, state))]
pub async fn index(
    shop: CurrentShop,
    State(state): State<AppState>,
    Path(campaign_id): Path<i32>,
) -> Result<ProgramListTemplate> {
    let campaign_id = CampaignId::new(campaign_id);
    let campaign = campaigns::get(&state.pool, shop.shop_id, campaign_id).await?;
    let programs = programs::list_by_campaign(&state.pool, shop.shop_id, campaign_id).await?;

    let focus_values = state
        .enum_cache
        .fetch()
        .await?
        .get("program_focus")
        .cloned()
        .unwrap_or_default();

    Ok(ProgramListTemplate {
        shop_domain: shop.domain,
        current_path: "/campaigns".to_string(),
        campaign,
        programs,
        focus_values,
    })
}

/// Create a program under a campaign.
#[instrument(skip(shop, state, form))]
pub async fn create(
    shop: CurrentShop,
    State(state): State<AppState>,
    Form(form): Form<ProgramForm>,
) -> Result<Redirect> {
    let (campaign_id, input) = form.into_input()?;
    programs::create(&state.pool, shop.shop_id, campaign_id, &input).await?;

    Ok(Redirect::to(&format!("/campaigns/{campaign_id}/programs")))
}

/// Update a program.
#[instrument(skip(shop, state, form))]
pub async fn update(
    shop: CurrentShop,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProgramForm>,
) -> Result<Redirect> {
    let (campaign_id, input) = form.into_input()?;
    programs::update(&state.pool, shop.shop_id, ProgramId::new(id), &input).await?;

    Ok(Redirect::to(&format!("/campaigns/{campaign_id}/programs")))
}
