//! OfferDesk Core - Shared types and pricing math.
//!
//! This crate provides common types used across all OfferDesk components:
//! - `admin` - Merchant-facing administration panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and status enums
//! - [`pricing`] - Cost-plus pricing and cart-discount allocation math

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use types::*;
