//! Platform webhook handlers.
//!
//! Every delivery is verified against the shared secret before the body
//! is parsed. A failed main upsert returns 500 and relies on the
//! platform's redelivery; the webhook log row is best effort and never
//! fails the request.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;

use offerdesk_core::{CartStatus, ShopId};

use crate::db::{
    PlatformSessionRepository, RepositoryError, carts, shops, variants, webhook_log,
};
use crate::platform::types::{OrderPayload, ProductPayload, ScopeUpdatePayload, UninstallPayload};
use crate::platform::webhooks::{SHOP_DOMAIN_HEADER, SIGNATURE_HEADER, verify_webhook_signature};
use crate::state::AppState;

/// Entry point for `POST /webhooks/{topic}`.
#[instrument(skip(state, headers, body), fields(payload_size = body.len()))]
pub async fn receive(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !verify_webhook_signature(&state.config.platform().webhook_secret, &body, signature) {
        tracing::warn!(topic, "webhook signature verification failed");
        webhook_log::record(&state.pool, None, &topic, body.len(), "invalid_signature").await;
        return StatusCode::UNAUTHORIZED;
    }

    let Some(shop_domain) = headers
        .get(SHOP_DOMAIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    else {
        webhook_log::record(&state.pool, None, &topic, body.len(), "missing_shop").await;
        return StatusCode::BAD_REQUEST;
    };

    let outcome = dispatch(&state, &topic, &shop_domain, &body).await;

    let shop_id = shops::resolve_shop_id(&state.pool, &shop_domain).await.ok();
    let (status, label) = match &outcome {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(DispatchError::UnknownTopic) => (StatusCode::NOT_FOUND, "unknown_topic"),
        Err(DispatchError::UnknownShop) => (StatusCode::NOT_FOUND, "unknown_shop"),
        Err(DispatchError::BadPayload(err)) => {
            tracing::warn!(topic, %err, "webhook payload parse failed");
            (StatusCode::BAD_REQUEST, "bad_payload")
        }
        Err(DispatchError::Repository(err)) => {
            tracing::error!(topic, %err, "webhook upsert failed");
            sentry::capture_error(err);
            (StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    };
    webhook_log::record(&state.pool, shop_id, &topic, body.len(), label).await;

    status
}

enum DispatchError {
    UnknownTopic,
    UnknownShop,
    BadPayload(serde_json::Error),
    Repository(RepositoryError),
}

impl From<RepositoryError> for DispatchError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::UnknownShop,
            other => Self::Repository(other),
        }
    }
}

/// Cart status an ingestion topic writes. Checkout syncs arrive before
/// the consumer completes payment; order syncs mean checkout happened.
fn ingest_status(topic: &str) -> Option<CartStatus> {
    match topic {
        "orders-create" | "orders-updated" => Some(CartStatus::Checkout),
        "checkouts-create" | "checkouts-updated" => Some(CartStatus::Abandoned),
        _ => None,
    }
}

async fn dispatch(
    state: &AppState,
    topic: &str,
    shop_domain: &str,
    body: &[u8],
) -> Result<(), DispatchError> {
    match topic {
        "orders-create" | "orders-updated" | "checkouts-create" | "checkouts-updated" => {
            let payload: OrderPayload =
                serde_json::from_slice(body).map_err(DispatchError::BadPayload)?;
            let shop_id = shops::resolve_shop_id(&state.pool, shop_domain).await?;
            let Some(status) = ingest_status(topic) else {
                return Err(DispatchError::UnknownTopic);
            };
            sync_cart(state, shop_id, &payload, status).await?;
            Ok(())
        }
        "products-update" => {
            let payload: ProductPayload =
                serde_json::from_slice(body).map_err(DispatchError::BadPayload)?;
            let shop_id = shops::resolve_shop_id(&state.pool, shop_domain).await?;
            for variant in &payload.variants {
                variants::upsert_variant(
                    &state.pool,
                    shop_id,
                    payload.id,
                    variant.id,
                    variant.sku.as_deref(),
                    &variant.title,
                )
                .await?;
            }
            Ok(())
        }
        "app-uninstalled" => {
            let payload: UninstallPayload =
                serde_json::from_slice(body).map_err(DispatchError::BadPayload)?;
            // The payload names the shop; the header is the fallback.
            let domain = payload.domain.as_deref().unwrap_or(shop_domain);
            shops::mark_uninstalled(&state.pool, domain).await?;
            PlatformSessionRepository::new(&state.pool)
                .delete_by_shop(domain)
                .await?;
            Ok(())
        }
        "scopes-update" => {
            let payload: ScopeUpdatePayload =
                serde_json::from_slice(body).map_err(DispatchError::BadPayload)?;
            PlatformSessionRepository::new(&state.pool)
                .update_scopes(shop_domain, &payload.current)
                .await?;
            Ok(())
        }
        // GDPR topics are acknowledged and logged; consumer data lives in
        // the platform, not here.
        "customers-redact" | "customers-data-request" => {
            tracing::info!(topic, shop_domain, "GDPR webhook acknowledged");
            Ok(())
        }
        _ => Err(DispatchError::UnknownTopic),
    }
}

/// Upsert the cart header and its lines from an order or checkout
/// payload.
async fn sync_cart(
    state: &AppState,
    shop_id: ShopId,
    payload: &OrderPayload,
    status: CartStatus,
) -> Result<(), RepositoryError> {
    let token = payload.cart_key();

    let item_count: i32 = payload.line_items.iter().map(|l| l.quantity).sum();
    let consumer_email = payload.customer.as_ref().and_then(|c| c.email.as_deref());

    let cart_id = carts::upsert_from_order(
        &state.pool,
        shop_id,
        &token,
        consumer_email,
        status,
        item_count,
        payload.total_price,
    )
    .await?;

    for line in &payload.line_items {
        carts::upsert_item(
            &state.pool,
            cart_id,
            line.variant_id,
            &line.title,
            line.sku.as_deref(),
            line.quantity,
            line.price,
        )
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_topics_ingest_as_pre_checkout_carts() {
        assert_eq!(
            ingest_status("checkouts-create"),
            Some(CartStatus::Abandoned)
        );
        assert_eq!(
            ingest_status("checkouts-updated"),
            Some(CartStatus::Abandoned)
        );
    }

    #[test]
    fn order_topics_ingest_as_checked_out_carts() {
        assert_eq!(ingest_status("orders-create"), Some(CartStatus::Checkout));
        assert_eq!(ingest_status("orders-updated"), Some(CartStatus::Checkout));
    }

    #[test]
    fn non_cart_topics_do_not_ingest() {
        assert_eq!(ingest_status("products-update"), None);
        assert_eq!(ingest_status("orders-delete"), None);
    }
}
