//! Wire types for the platform Admin API and webhook payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as returned by `GET /products/{id}.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Find a variant of this product by its platform variant id.
    #[must_use]
    pub fn variant(&self, platform_variant_id: i64) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == platform_variant_id)
    }
}

/// A variant embedded in a product response or webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariant {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    pub title: String,
    /// The platform serializes money as decimal strings.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Body for `PUT /variants/{id}.json`.
#[derive(Debug, Serialize)]
pub struct VariantPriceUpdate {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Cart sync payload (`orders/create`, `orders/updated`,
/// `checkouts/create`, `checkouts/updated`).
///
/// Orders and checkouts share the fields the cart upsert needs; orders
/// carry `cart_token`, checkouts carry `token`. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPayload {
    pub id: i64,
    #[serde(default)]
    pub cart_token: Option<String>,
    /// Checkout token (checkout payloads only).
    #[serde(default)]
    pub token: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
}

impl OrderPayload {
    /// The token that ties this payload back to a cart row. Orders
    /// without a cart token get a synthetic one so the upsert still has
    /// a stable key.
    #[must_use]
    pub fn cart_key(&self) -> String {
        self.cart_token
            .clone()
            .or_else(|| self.token.clone())
            .unwrap_or_else(|| format!("order-{}", self.id))
    }
}

/// Customer reference inside an order payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRef {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Line item inside an order payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineItem {
    pub variant_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Product webhook payload (`products/update`).
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// App uninstall webhook payload (`app/uninstalled`).
#[derive(Debug, Clone, Deserialize)]
pub struct UninstallPayload {
    #[serde(default)]
    pub domain: Option<String>,
}

/// Scope update webhook payload (`app/scopes_update`).
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeUpdatePayload {
    #[serde(default)]
    pub current: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_payload_parses_minimal_json() {
        let json = r#"{
            "id": 9001,
            "cart_token": "tok_abc",
            "total_price": "129.95",
            "customer": {"id": 7, "email": "a@b.test"},
            "line_items": [
                {"variant_id": 42, "title": "Widget", "sku": "W-1", "quantity": 2, "price": "59.99"}
            ]
        }"#;

        let order: OrderPayload = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, 9001);
        assert_eq!(order.cart_token.as_deref(), Some("tok_abc"));
        assert_eq!(order.total_price.to_string(), "129.95");
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].variant_id, Some(42));
    }

    #[test]
    fn order_payload_tolerates_missing_customer() {
        let json = r#"{"id": 1, "total_price": "5.00", "customer": null}"#;
        let order: OrderPayload = serde_json::from_str(json).unwrap();
        assert!(order.customer.is_none());
        assert!(order.line_items.is_empty());
    }

    #[test]
    fn checkout_payload_parses_with_token() {
        let json = r#"{
            "id": 3001,
            "token": "chk_xyz",
            "total_price": "75.00",
            "customer": null,
            "line_items": [
                {"variant_id": 42, "title": "Widget", "quantity": 1, "price": "75.00"}
            ]
        }"#;

        let checkout: OrderPayload = serde_json::from_str(json).unwrap();
        assert!(checkout.cart_token.is_none());
        assert_eq!(checkout.cart_key(), "chk_xyz");
    }

    #[test]
    fn cart_key_prefers_cart_token_then_token() {
        let mut payload: OrderPayload =
            serde_json::from_str(r#"{"id": 7, "total_price": "1.00", "customer": null}"#).unwrap();
        assert_eq!(payload.cart_key(), "order-7");

        payload.token = Some("chk_a".to_string());
        assert_eq!(payload.cart_key(), "chk_a");

        payload.cart_token = Some("c1-b".to_string());
        assert_eq!(payload.cart_key(), "c1-b");
    }

    #[test]
    fn product_variant_lookup_by_platform_id() {
        let json = r#"{
            "id": 55,
            "title": "Widget",
            "variants": [
                {"id": 42, "sku": "W-1", "title": "Small", "price": "19.99"},
                {"id": 43, "sku": "W-2", "title": "Large", "price": "24.99"}
            ]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        let found = product.variant(43).unwrap();
        assert_eq!(found.sku.as_deref(), Some("W-2"));
        assert!(product.variant(99).is_none());
    }

    #[test]
    fn product_payload_parses_variants() {
        let json = r#"{
            "id": 55,
            "title": "Widget",
            "variants": [{"id": 42, "sku": "W-1", "title": "Default", "price": "19.99"}]
        }"#;
        let product: ProductPayload = serde_json::from_str(json).unwrap();
        assert_eq!(product.variants[0].price.to_string(), "19.99");
    }
}
