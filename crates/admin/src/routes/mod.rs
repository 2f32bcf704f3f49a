//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Dashboard
//! GET  /                           - Dashboard overview
//!
//! # Offers
//! GET  /offers                     - Offer listing (filterable by status)
//! GET  /offers/{id}                - Offer detail with settle allocation
//! POST /offers/{id}/counter        - Record a counter-offer
//! POST /offers/{id}/status         - Write a new offer status
//!
//! # Campaigns and programs
//! GET  /campaigns                  - Campaign listing
//! POST /campaigns                  - Create campaign
//! GET  /campaigns/{id}             - Campaign detail with programs
//! POST /campaigns/{id}             - Update campaign
//! GET  /campaigns/{id}/programs    - Program listing for a campaign
//! POST /programs                   - Create program
//! POST /programs/{id}              - Update program
//!
//! # Price builder
//! GET  /pricebuilder               - Variant pricing worksheet
//! POST /pricebuilder/preview       - Preview a bulk adjustment
//! POST /pricebuilder/publish       - Publish pending changes
//!
//! # Analytics
//! GET  /analytics                  - Offer funnel and webhook log
//!
//! # Events and webhooks
//! GET  /events                     - SSE stream (enum_changed)
//! POST /webhooks/{topic}           - Signed platform webhooks
//! ```

pub mod analytics;
pub mod campaigns;
pub mod dashboard;
pub mod events;
pub mod offers;
pub mod pricebuilder;
pub mod programs;
pub mod webhooks;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the offer routes router.
pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(offers::index))
        .route("/{id}", get(offers::show))
        .route("/{id}/counter", post(offers::counter))
        .route("/{id}/status", post(offers::set_status))
}

/// Create the campaign routes router.
pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::index).post(campaigns::create))
        .route("/{id}", get(campaigns::show).post(campaigns::update))
        .route("/{id}/programs", get(programs::index))
}

/// Create the program routes router.
pub fn program_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(programs::create))
        .route("/{id}", post(programs::update))
}

/// Create the price builder routes router.
pub fn pricebuilder_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pricebuilder::index))
        .route("/preview", post(pricebuilder::preview))
        .route("/publish", post(pricebuilder::publish))
}

/// Create the webhook routes router.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/{topic}", post(webhooks::receive))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Dashboard
        .route("/", get(dashboard::index))
        // Offer workflow
        .nest("/offers", offer_routes())
        // Campaign configuration
        .nest("/campaigns", campaign_routes())
        .nest("/programs", program_routes())
        // Bulk pricing
        .nest("/pricebuilder", pricebuilder_routes())
        // Analytics
        .route("/analytics", get(analytics::index))
        // Server-sent events
        .route("/events", get(events::stream))
        // Platform webhooks (signature-verified, not session-gated)
        .nest("/webhooks", webhook_routes())
}

/// Health check endpoint.
async fn health() -> &'static str {
    "OK"
}

/// Readiness check: verifies the database answers.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::error!(%err, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
