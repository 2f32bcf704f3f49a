//! Integration tests for OfferDesk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p offerdesk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `offer_lifecycle` - Offer and cart status semantics
//! - `pricing_worksheet` - Bulk price editor adjustment math
//! - `discount_allocation` - Cart-discount allocation across line items
//! - `webhook_ingestion` - Signature verification and payload parsing
//!
//! Tests in this crate exercise the library crates without a running
//! database or platform connection, so no setup is needed beyond the
//! workspace build.
