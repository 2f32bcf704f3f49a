//! Platform Admin API client.
//!
//! One client per process; per-shop access tokens are passed per call.
//! Product lookups are cached in a moka future cache since the
//! pricebuilder reads the same products repeatedly within a session.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use super::PlatformError;
use super::types::{Product, VariantPriceUpdate};
use crate::config::PlatformConfig;

const PRODUCT_CACHE_CAPACITY: u64 = 2_000;
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const TOKEN_HEADER: &str = "X-Platform-Access-Token";

/// HTTP client for the platform Admin API.
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    api_version: String,
    product_cache: Cache<(String, i64), Arc<Product>>,
}

impl PlatformClient {
    /// Build a client from the platform configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Http`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("offerdesk-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let product_cache = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Ok(Self {
            http,
            api_version: config.api_version.clone(),
            product_cache,
        })
    }

    fn admin_url(&self, shop_domain: &str, path: &str) -> String {
        format!(
            "https://{shop_domain}/admin/api/{}/{path}",
            self.api_version
        )
    }

    /// Fetch a product by id, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request fails or the platform
    /// responds with a non-success status.
    pub async fn get_product(
        &self,
        shop_domain: &str,
        access_token: &SecretString,
        product_id: i64,
    ) -> Result<Arc<Product>, PlatformError> {
        let key = (shop_domain.to_string(), product_id);
        if let Some(cached) = self.product_cache.get(&key).await {
            return Ok(cached);
        }

        let url = self.admin_url(shop_domain, &format!("products/{product_id}.json"));
        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, access_token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let product: Product = serde_json::from_value(
            body.get("product")
                .cloned()
                .ok_or_else(|| PlatformError::UnexpectedResponse("missing product key".into()))?,
        )
        .map_err(|e| PlatformError::UnexpectedResponse(e.to_string()))?;

        let product = Arc::new(product);
        self.product_cache.insert(key, Arc::clone(&product)).await;
        Ok(product)
    }

    /// Push a new variant price to the platform.
    ///
    /// Invalidating cached products that contain the variant is the
    /// caller's responsibility; the pricebuilder drops the whole cache
    /// after a publish run via [`Self::invalidate_products`].
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request fails or the platform
    /// rejects the update.
    pub async fn update_variant_price(
        &self,
        shop_domain: &str,
        access_token: &SecretString,
        platform_variant_id: i64,
        price: Decimal,
    ) -> Result<(), PlatformError> {
        let url = self.admin_url(shop_domain, &format!("variants/{platform_variant_id}.json"));
        let body = json!({
            "variant": VariantPriceUpdate {
                id: platform_variant_id,
                price,
            }
        });

        let response = self
            .http
            .put(&url)
            .header(TOKEN_HEADER, access_token.expose_secret())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Drop all cached product lookups.
    pub fn invalidate_products(&self) {
        self.product_cache.invalidate_all();
    }
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> PlatformConfig {
        PlatformConfig {
            api_version: "2026-01".to_string(),
            api_key: "key".to_string(),
            api_secret: SecretString::from("s1"),
            webhook_secret: SecretString::from("s2"),
        }
    }

    #[test]
    fn admin_url_includes_version_and_path() {
        let client = PlatformClient::new(&test_config()).unwrap();
        let url = client.admin_url("demo.myplatform.test", "products/42.json");
        assert_eq!(
            url,
            "https://demo.myplatform.test/admin/api/2026-01/products/42.json"
        );
    }

    #[test]
    fn debug_omits_internals() {
        let client = PlatformClient::new(&test_config()).unwrap();
        let out = format!("{client:?}");
        assert!(out.contains("2026-01"));
    }
}
