//! Webhook signature verification.
//!
//! The platform signs each webhook body with HMAC-SHA256 over the raw
//! bytes and sends the digest base64-encoded in a header. Verification
//! uses `Mac::verify_slice`, which compares in constant time.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC digest.
pub const SIGNATURE_HEADER: &str = "x-platform-hmac-sha256";

/// Header carrying the webhook topic.
pub const TOPIC_HEADER: &str = "x-platform-topic";

/// Header carrying the originating shop domain.
pub const SHOP_DOMAIN_HEADER: &str = "x-platform-shop-domain";

/// Verify a webhook body against its signature header.
///
/// Returns `false` for a malformed base64 signature rather than erroring,
/// so callers treat it the same as a bad digest.
#[must_use]
pub fn verify_webhook_signature(
    secret: &SecretString,
    body: &[u8],
    signature_b64: &str,
) -> bool {
    let Ok(signature) = BASE64.decode(signature_b64) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_verifies() {
        let secret = SecretString::from("whsec_k3y");
        let body = br#"{"id": 1}"#;
        let sig = sign("whsec_k3y", body);
        assert!(verify_webhook_signature(&secret, body, &sig));
    }

    #[test]
    fn wrong_secret_fails() {
        let secret = SecretString::from("whsec_other");
        let body = br#"{"id": 1}"#;
        let sig = sign("whsec_k3y", body);
        assert!(!verify_webhook_signature(&secret, body, &sig));
    }

    #[test]
    fn tampered_body_fails() {
        let secret = SecretString::from("whsec_k3y");
        let sig = sign("whsec_k3y", br#"{"id": 1}"#);
        assert!(!verify_webhook_signature(&secret, br#"{"id": 2}"#, &sig));
    }

    #[test]
    fn malformed_base64_fails_closed() {
        let secret = SecretString::from("whsec_k3y");
        assert!(!verify_webhook_signature(&secret, b"body", "not base64!!"));
    }
}
