//! Tenant resolution extractor.
//!
//! Every page handler takes a [`CurrentShop`], which resolves the
//! requesting merchant once per request: the shop domain comes from the
//! browser session (seeded from the embedded-app header on first
//! request), and the shop id from the `shops` table. An unknown or
//! uninstalled shop rejects the request.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use offerdesk_core::ShopId;

use crate::db::shops;
use crate::error::set_sentry_shop;
use crate::platform::webhooks::SHOP_DOMAIN_HEADER;
use crate::state::AppState;

/// Session key holding the shop domain.
const SHOP_DOMAIN_KEY: &str = "shop_domain";

/// The resolved merchant tenant for this request.
#[derive(Debug, Clone)]
pub struct CurrentShop {
    pub shop_id: ShopId,
    pub domain: String,
}

/// Rejection for requests with no resolvable shop.
#[derive(Debug)]
pub enum ShopRejection {
    /// No shop domain in the session or headers.
    Unauthenticated,
    /// Domain known to the request but not installed.
    UnknownShop(String),
    /// Session store or database failure.
    Internal,
}

impl IntoResponse for ShopRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "No shop associated with request").into_response()
            }
            Self::UnknownShop(domain) => (
                StatusCode::NOT_FOUND,
                format!("Shop {domain} is not installed"),
            )
                .into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for CurrentShop {
    type Rejection = ShopRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(ShopRejection::Internal)?;

        let domain = match session
            .get::<String>(SHOP_DOMAIN_KEY)
            .await
            .map_err(|_| ShopRejection::Internal)?
        {
            Some(domain) => domain,
            None => {
                // First request from the embedded app carries the shop
                // domain as a header; persist it to the session.
                let domain = parts
                    .headers
                    .get(SHOP_DOMAIN_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
                    .ok_or(ShopRejection::Unauthenticated)?;

                session
                    .insert(SHOP_DOMAIN_KEY, &domain)
                    .await
                    .map_err(|_| ShopRejection::Internal)?;
                domain
            }
        };

        let shop_id = match shops::resolve_shop_id(&state.pool, &domain).await {
            Ok(id) => id,
            Err(crate::db::RepositoryError::NotFound) => {
                return Err(ShopRejection::UnknownShop(domain));
            }
            Err(err) => {
                tracing::error!(%err, domain, "shop resolution failed");
                return Err(ShopRejection::Internal);
            }
        };

        set_sentry_shop(shop_id.as_i32(), &domain);

        Ok(Self { shop_id, domain })
    }
}
