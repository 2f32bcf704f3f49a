//! Commerce platform Admin API integration.
//!
//! Covers the three things the admin panel needs from the platform:
//! product/variant lookups (cached), variant price updates during a
//! pricebuilder publish, and webhook signature verification.

pub mod client;
pub mod types;
pub mod webhooks;

use thiserror::Error;

pub use client::PlatformClient;
pub use webhooks::verify_webhook_signature;

/// Errors from the platform Admin API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Network or protocol failure talking to the platform.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned a non-success status.
    #[error("Platform API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),

    /// No stored session exists for the shop.
    #[error("No platform session for shop {0}")]
    NoSession(String),
}
