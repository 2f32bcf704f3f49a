//! Bulk price builder route handlers.
//!
//! Preview applies an adjustment to every variant's current pricing and
//! counts rows whose selling price moves by at least one cent. Publish
//! walks the changed rows one variant at a time: resolve the variant's
//! product on the platform, write the new pricing version, push the
//! price, mark it published. A failed variant is recorded and the loop
//! moves on; there is no batching and no rollback of already-published
//! rows.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use offerdesk_core::pricing::{
    FormulaPercents, PriceAdjustment, PricingComponents, is_material_change,
};
use offerdesk_core::VariantId;

use crate::db::variants::{self, VariantWithPricing};
use crate::db::PlatformSessionRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentShop;
use crate::platform::PlatformError;
use crate::state::AppState;

/// One variant row on the worksheet.
pub struct WorksheetRow {
    pub variant_id: VariantId,
    pub sku: Option<String>,
    pub title: String,
    pub version: Option<i32>,
    pub cost: Decimal,
    pub current_price: Decimal,
    pub published: bool,
}

impl From<&VariantWithPricing> for WorksheetRow {
    fn from(v: &VariantWithPricing) -> Self {
        Self {
            variant_id: v.variant.id,
            sku: v.variant.sku.clone(),
            title: v.variant.title.clone(),
            version: v.pricing.as_ref().map(|p| p.version),
            cost: v.pricing.as_ref().map(|p| p.cost).unwrap_or_default(),
            current_price: v
                .pricing
                .as_ref()
                .map(|p| p.selling_price)
                .unwrap_or_default(),
            published: v.pricing.as_ref().is_some_and(|p| p.published),
        }
    }
}

/// Worksheet template.
#[derive(Template, WebTemplate)]
#[template(path = "pricebuilder/index.html")]
pub struct WorksheetTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub rows: Vec<WorksheetRow>,
}

/// One previewed row: current vs recomputed price.
pub struct PreviewRow {
    pub sku: Option<String>,
    pub title: String,
    pub current_price: Decimal,
    pub new_price: Decimal,
    pub changed: bool,
}

/// Preview template.
#[derive(Template, WebTemplate)]
#[template(path = "pricebuilder/preview.html")]
pub struct PreviewTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub rows: Vec<PreviewRow>,
    pub changed_count: usize,
    pub form: AdjustmentForm,
}

/// Outcome of one variant in a publish run.
pub struct PublishOutcome {
    pub sku: Option<String>,
    pub title: String,
    pub new_price: Decimal,
    pub error: Option<String>,
}

/// Publish result template.
#[derive(Template, WebTemplate)]
#[template(path = "pricebuilder/publish.html")]
pub struct PublishTemplate {
    pub shop_domain: String,
    pub current_path: String,
    pub outcomes: Vec<PublishOutcome>,
    pub published_count: usize,
    pub failed_count: usize,
}

/// Adjustment form data, shared by preview and publish.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentForm {
    pub mode: String,
    pub percent: Option<Decimal>,
    pub flat_amount: Option<Decimal>,
    pub profit_pct: Option<Decimal>,
    pub discount_pct: Option<Decimal>,
    pub shrink_pct: Option<Decimal>,
    pub financing_pct: Option<Decimal>,
    pub shipping_pct: Option<Decimal>,
    pub market_pct: Option<Decimal>,
}

impl AdjustmentForm {
    fn adjustment(&self) -> Result<PriceAdjustment> {
        match self.mode.as_str() {
            "percent" => {
                let percent = self
                    .percent
                    .ok_or_else(|| AppError::BadRequest("Percent value is required".into()))?;
                Ok(PriceAdjustment::Percent { percent })
            }
            "flat" => {
                let amount = self
                    .flat_amount
                    .ok_or_else(|| AppError::BadRequest("Flat amount is required".into()))?;
                Ok(PriceAdjustment::Flat { amount })
            }
            "formula" => Ok(PriceAdjustment::Formula {
                percents: FormulaPercents {
                    profit_pct: self.profit_pct.unwrap_or_default(),
                    discount_pct: self.discount_pct.unwrap_or_default(),
                    shrink_pct: self.shrink_pct.unwrap_or_default(),
                    financing_pct: self.financing_pct.unwrap_or_default(),
                    shipping_pct: self.shipping_pct.unwrap_or_default(),
                    market_pct: self.market_pct.unwrap_or_default(),
                },
            }),
            other => Err(AppError::BadRequest(format!(
                "Unknown adjustment mode: {other}"
            ))),
        }
    }
}

/// A variant with its recomputed components, ready to preview or publish.
struct Recomputed {
    variant: VariantWithPricing,
    current_price: Decimal,
    new: PricingComponents,
    new_price: Decimal,
    changed: bool,
}

/// Apply the adjustment to every variant that has a current pricing row.
fn recompute(rows: Vec<VariantWithPricing>, adjustment: &PriceAdjustment) -> Vec<Recomputed> {
    rows.into_iter()
        .filter_map(|v| {
            let pricing = v.pricing.as_ref()?;
            let current_price = pricing.selling_price;
            let new = adjustment.apply(&pricing.components());
            let new_price = new.selling_price();
            let changed = is_material_change(current_price, new_price);
            Some(Recomputed {
                variant: v,
                current_price,
                new,
                new_price,
                changed,
            })
        })
        .collect()
}

/// Pricing worksheet handler.
#[instrument(skip(shop, state))]
pub async fn index(shop: CurrentShop, State(state): State<AppState>) -> Result<WorksheetTemplate> {
    let variants = variants::list_with_current_pricing(&state.pool, shop.shop_id).await?;
    let rows = variants.iter().map(WorksheetRow::from).collect();

    Ok(WorksheetTemplate {
        shop_domain: shop.domain,
        current_path: "/pricebuilder".to_string(),
        rows,
    })
}

/// Preview a bulk adjustment without writing anything.
#[instrument(skip(shop, state, form))]
pub async fn preview(
    shop: CurrentShop,
    State(state): State<AppState>,
    Form(form): Form<AdjustmentForm>,
) -> Result<PreviewTemplate> {
    let adjustment = form.adjustment()?;
    let variants = variants::list_with_current_pricing(&state.pool, shop.shop_id).await?;
    let recomputed = recompute(variants, &adjustment);

    let changed_count = recomputed.iter().filter(|r| r.changed).count();
    let rows = recomputed
        .into_iter()
        .map(|r| PreviewRow {
            sku: r.variant.variant.sku,
            title: r.variant.variant.title,
            current_price: r.current_price,
            new_price: r.new_price,
            changed: r.changed,
        })
        .collect();

    Ok(PreviewTemplate {
        shop_domain: shop.domain,
        current_path: "/pricebuilder".to_string(),
        rows,
        changed_count,
        form,
    })
}

/// Publish every materially changed row, one variant at a time.
#[instrument(skip(shop, state, form))]
pub async fn publish(
    shop: CurrentShop,
    State(state): State<AppState>,
    Form(form): Form<AdjustmentForm>,
) -> Result<PublishTemplate> {
    let adjustment = form.adjustment()?;

    let session = PlatformSessionRepository::new(&state.pool)
        .find_by_shop(&shop.domain)
        .await?
        .ok_or_else(|| AppError::Platform(PlatformError::NoSession(shop.domain.clone())))?;

    let variants = variants::list_with_current_pricing(&state.pool, shop.shop_id).await?;
    let recomputed = recompute(variants, &adjustment);

    let mut outcomes = Vec::new();
    for r in recomputed.into_iter().filter(|r| r.changed) {
        let result =
            publish_one(&state, &shop.domain, &session.access_token, &r).await;

        if let Err(ref err) = result {
            tracing::error!(
                variant_id = %r.variant.variant.id,
                %err,
                "variant publish failed"
            );
        }

        outcomes.push(PublishOutcome {
            sku: r.variant.variant.sku.clone(),
            title: r.variant.variant.title.clone(),
            new_price: r.new_price,
            error: result.err().map(|e| e.to_string()),
        });
    }

    // Product lookups are stale after a publish run.
    state.platform.invalidate_products();

    let failed_count = outcomes.iter().filter(|o| o.error.is_some()).count();
    let published_count = outcomes.len() - failed_count;

    Ok(PublishTemplate {
        shop_domain: shop.domain,
        current_path: "/pricebuilder".to_string(),
        outcomes,
        published_count,
        failed_count,
    })
}

/// Resolve one variant's product, write its new pricing version, push
/// the price to the platform, and mark it published.
async fn publish_one(
    state: &AppState,
    shop_domain: &str,
    access_token: &secrecy::SecretString,
    r: &Recomputed,
) -> Result<()> {
    // Resolve the product first so a variant deleted on the platform
    // never gets a local pricing version.
    let product = state
        .platform
        .get_product(
            shop_domain,
            access_token,
            r.variant.variant.platform_product_id,
        )
        .await?;
    if product.variant(r.variant.variant.platform_variant_id).is_none() {
        return Err(AppError::Platform(PlatformError::UnexpectedResponse(
            format!(
                "variant {} is no longer on product {}",
                r.variant.variant.platform_variant_id, r.variant.variant.platform_product_id
            ),
        )));
    }

    let pricing_id =
        variants::insert_pricing_version(&state.pool, r.variant.variant.id, &r.new).await?;

    state
        .platform
        .update_variant_price(
            shop_domain,
            access_token,
            r.variant.variant.platform_variant_id,
            r.new_price,
        )
        .await?;

    variants::mark_published(&state.pool, pricing_id).await?;

    Ok(())
}
