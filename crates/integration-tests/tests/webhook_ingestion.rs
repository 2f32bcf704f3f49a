//! Integration tests for webhook signature verification and payload
//! parsing.
//!
//! Signs realistic platform payloads the way the platform does and runs
//! them through verification and deserialization without a live server.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use sha2::Sha256;

use offerdesk_admin::platform::types::{
    OrderPayload, ProductPayload, ScopeUpdatePayload, UninstallPayload,
};
use offerdesk_admin::platform::verify_webhook_signature;
use offerdesk_admin::platform::webhooks::{SHOP_DOMAIN_HEADER, SIGNATURE_HEADER, TOPIC_HEADER};

fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

const ORDER_BODY: &str = r#"{
    "id": 820982911946154500,
    "cart_token": "c1-abc123",
    "total_price": "149.90",
    "customer": {
        "id": 115310627314723950,
        "email": "jane@example.com",
        "first_name": "Jane",
        "last_name": "Smith"
    },
    "line_items": [
        {
            "variant_id": 808950810,
            "title": "Canvas Tote",
            "sku": "TOTE-001",
            "quantity": 2,
            "price": "29.95"
        },
        {
            "variant_id": null,
            "title": "Gift Wrap",
            "sku": null,
            "quantity": 1,
            "price": "5.00"
        }
    ]
}"#;

// =============================================================================
// Signature Tests
// =============================================================================

#[test]
fn test_signed_order_body_verifies() {
    let secret = SecretString::from("whsec_integration");
    let sig = sign("whsec_integration", ORDER_BODY.as_bytes());
    assert!(verify_webhook_signature(
        &secret,
        ORDER_BODY.as_bytes(),
        &sig
    ));
}

#[test]
fn test_signature_breaks_on_single_byte_change() {
    let secret = SecretString::from("whsec_integration");
    let sig = sign("whsec_integration", ORDER_BODY.as_bytes());
    let tampered = ORDER_BODY.replace("149.90", "149.91");
    assert!(!verify_webhook_signature(
        &secret,
        tampered.as_bytes(),
        &sig
    ));
}

#[test]
fn test_signature_from_different_secret_fails() {
    let secret = SecretString::from("whsec_integration");
    let sig = sign("whsec_rotated", ORDER_BODY.as_bytes());
    assert!(!verify_webhook_signature(
        &secret,
        ORDER_BODY.as_bytes(),
        &sig
    ));
}

#[test]
fn test_header_names_are_lowercase() {
    // Header lookups go through HeaderMap, which is case-insensitive,
    // but the constants are also compared against raw header dumps in
    // the webhook log and must stay lowercase.
    for header in [SIGNATURE_HEADER, TOPIC_HEADER, SHOP_DOMAIN_HEADER] {
        assert_eq!(header, header.to_lowercase());
    }
}

// =============================================================================
// Payload Parsing Tests
// =============================================================================

#[test]
fn test_order_payload_parses() {
    let order: OrderPayload = serde_json::from_str(ORDER_BODY).unwrap();

    assert_eq!(order.cart_token.as_deref(), Some("c1-abc123"));
    assert_eq!(order.total_price.to_string(), "149.90");
    assert_eq!(order.line_items.len(), 2);
    assert_eq!(order.line_items[0].quantity, 2);
    // Custom line items arrive without a variant id.
    assert!(order.line_items[1].variant_id.is_none());

    let customer = order.customer.unwrap();
    assert_eq!(customer.email.as_deref(), Some("jane@example.com"));
}

#[test]
fn test_order_payload_tolerates_missing_optional_fields() {
    // Guest checkouts omit the customer; some channels omit cart_token.
    let body = r#"{"id": 1, "total_price": "10.00", "line_items": []}"#;
    let order: OrderPayload = serde_json::from_str(body).unwrap();

    assert!(order.customer.is_none());
    assert!(order.cart_token.is_none());
    assert!(order.line_items.is_empty());
}

#[test]
fn test_checkout_payload_parses_like_an_order() {
    // Checkout create/update deliveries carry `token` where orders carry
    // `cart_token`; both feed the same cart upsert.
    let body = r#"{
        "id": 901414060,
        "token": "chk-2a1ace52255252df566af0d65",
        "total_price": "59.90",
        "customer": null,
        "line_items": [
            {"variant_id": 808950810, "title": "Canvas Tote", "sku": "TOTE-001", "quantity": 2, "price": "29.95"}
        ]
    }"#;
    let checkout: OrderPayload = serde_json::from_str(body).unwrap();

    assert_eq!(checkout.cart_key(), "chk-2a1ace52255252df566af0d65");
    assert_eq!(checkout.total_price.to_string(), "59.90");
    assert_eq!(checkout.line_items.len(), 1);
}

#[test]
fn test_product_payload_parses_variants() {
    let body = r#"{
        "id": 632910392,
        "title": "Canvas Tote",
        "variants": [
            {"id": 808950810, "sku": "TOTE-001", "title": "Default", "price": "29.95"}
        ]
    }"#;
    let product: ProductPayload = serde_json::from_str(body).unwrap();

    assert_eq!(product.variants.len(), 1);
    assert_eq!(product.variants[0].price.to_string(), "29.95");
}

#[test]
fn test_uninstall_payload_parses() {
    let payload: UninstallPayload =
        serde_json::from_str(r#"{"domain": "dev-shop.myplatform.test"}"#).unwrap();
    assert_eq!(payload.domain.as_deref(), Some("dev-shop.myplatform.test"));
}

#[test]
fn test_uninstall_payload_without_domain_leaves_header_fallback() {
    // Some deliveries arrive with an empty body; the handler then falls
    // back to the shop domain header.
    let payload: UninstallPayload = serde_json::from_str("{}").unwrap();
    assert!(payload.domain.is_none());
}

#[test]
fn test_scope_update_payload_parses() {
    let payload: ScopeUpdatePayload =
        serde_json::from_str(r#"{"current": ["read_products", "write_products"]}"#).unwrap();
    assert_eq!(payload.current.len(), 2);
}
