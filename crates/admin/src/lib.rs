//! OfferDesk Admin library.
//!
//! This crate provides the merchant admin panel as a library, allowing it
//! to be tested and reused from the CLI and integration tests.
//!
//! # Security
//!
//! This crate holds commerce platform Admin API tokens with write access
//! to products and discounts. Deploy behind the platform's embedded-app
//! session verification only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod enum_cache;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod platform;
pub mod routes;
pub mod state;
