//! Integration tests for offer and cart lifecycle semantics.
//!
//! These tests verify the status vocabulary shared between the admin
//! panel and the database enums without requiring a live database.
//! The transition guard itself lives in a database trigger; here we pin
//! down which statuses the application treats as terminal and which as
//! accepted.

use std::str::FromStr;

use offerdesk_core::types::{CartStatus, OfferStatus, ProgramFocus};

// =============================================================================
// Offer Status Tests
// =============================================================================

#[test]
fn test_offer_status_display_matches_database_labels() {
    // The Display labels must match the Postgres enum values exactly,
    // since filter query strings and enum-cache entries compare on them.
    let expected = [
        "pending",
        "auto_accepted",
        "auto_declined",
        "auto_countered",
        "accepted",
        "declined",
        "countered",
        "checked_out",
        "expired",
        "cancelled",
    ];
    let actual: Vec<String> = OfferStatus::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_offer_status_filter_roundtrip() {
    // Status filters arrive as query-string values and must parse back.
    for status in OfferStatus::ALL {
        assert_eq!(OfferStatus::from_str(&status.to_string()), Ok(status));
    }
}

#[test]
fn test_offer_status_rejects_unknown_filter() {
    assert!(OfferStatus::from_str("negotiating").is_err());
    assert!(OfferStatus::from_str("").is_err());
    assert!(OfferStatus::from_str("Pending").is_err());
}

#[test]
fn test_accepted_statuses_cover_auto_and_manual() {
    // Dashboard and analytics treat these three as revenue-won.
    assert!(OfferStatus::Accepted.is_accepted());
    assert!(OfferStatus::AutoAccepted.is_accepted());
    assert!(OfferStatus::CheckedOut.is_accepted());

    for status in [
        OfferStatus::Pending,
        OfferStatus::Declined,
        OfferStatus::AutoDeclined,
        OfferStatus::Countered,
        OfferStatus::AutoCountered,
        OfferStatus::Expired,
        OfferStatus::Cancelled,
    ] {
        assert!(!status.is_accepted(), "{status} must not count as accepted");
    }
}

// =============================================================================
// Terminal State Tests (Logical)
// =============================================================================

/// The database trigger blocks status updates out of `checked_out` and
/// `cancelled`. Every other status may still move.
#[test]
fn test_terminal_states_are_distinct_from_live_states() {
    let terminal = [OfferStatus::CheckedOut, OfferStatus::Cancelled];
    let live = [
        OfferStatus::Pending,
        OfferStatus::Countered,
        OfferStatus::Accepted,
        OfferStatus::Declined,
    ];

    for t in terminal {
        for l in live {
            assert_ne!(t, l);
        }
    }
}

// =============================================================================
// Cart Status Tests
// =============================================================================

#[test]
fn test_cart_status_roundtrip() {
    let statuses = [
        CartStatus::Abandoned,
        CartStatus::Offered,
        CartStatus::Checkout,
        CartStatus::Expired,
        CartStatus::ClosedWon,
        CartStatus::ClosedLost,
    ];
    for status in statuses {
        assert_eq!(CartStatus::from_str(&status.to_string()), Ok(status));
    }
}

#[test]
fn test_order_ingestion_uses_checkout_status() {
    // Orders arriving over webhooks mark the cart as in checkout; the
    // label feeds straight into the upsert procedure.
    assert_eq!(CartStatus::Checkout.to_string(), "checkout");
}

// =============================================================================
// Program Focus Tests
// =============================================================================

#[test]
fn test_program_focus_roundtrip() {
    for focus in [
        ProgramFocus::Conversion,
        ProgramFocus::Margin,
        ProgramFocus::Clearance,
        ProgramFocus::Loyalty,
    ] {
        assert_eq!(ProgramFocus::from_str(&focus.to_string()), Ok(focus));
    }
}

#[test]
fn test_program_focus_rejects_unknown() {
    assert!(ProgramFocus::from_str("growth").is_err());
}
