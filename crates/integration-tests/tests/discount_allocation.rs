//! Integration tests for cart-discount allocation.
//!
//! Drives the Selling/Settle allocation the way the offer detail page
//! does, checking the conservation and clamping properties across
//! realistic cart shapes.

use rust_decimal::Decimal;

use offerdesk_core::pricing::{OfferLine, allocate_cart_discount};

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

fn line(price: &str, cost: &str, qty: i32) -> OfferLine {
    OfferLine {
        unit_price: dec(price),
        unit_cost: dec(cost),
        quantity: qty,
    }
}

// =============================================================================
// Conservation Tests
// =============================================================================

#[test]
fn test_settle_total_equals_offer_price() {
    // When nothing clamps, the settle total is exactly the offered price.
    let items = [
        line("24.99", "11.00", 2),
        line("59.00", "32.50", 1),
        line("8.75", "3.25", 4),
    ];
    let cart_total: Decimal = items.iter().map(OfferLine::line_total).sum();
    let offer = dec("120.00");
    let alloc = allocate_cart_discount(&items, cart_total, offer);

    assert!(
        (alloc.total_settle - offer).abs() <= CENT,
        "settle total {} should match offer {offer}",
        alloc.total_settle
    );
}

#[test]
fn test_allowances_sum_to_delta() {
    let items = [line("100.00", "55.00", 1), line("45.50", "20.00", 3)];
    let cart_total: Decimal = items.iter().map(OfferLine::line_total).sum();
    let alloc = allocate_cart_discount(&items, cart_total, cart_total - dec("30.00"));

    let allocated: Decimal = alloc.lines.iter().map(|l| l.allowance).sum();
    assert!((allocated - alloc.delta).abs() <= CENT);
}

#[test]
fn test_gross_margin_is_settle_minus_cost() {
    let items = [line("50.00", "20.00", 1), line("30.00", "12.00", 1)];
    let alloc = allocate_cart_discount(&items, dec("80.00"), dec("70.00"));

    let total_cost: Decimal = items.iter().map(OfferLine::line_cost).sum();
    assert_eq!(alloc.gross_margin, alloc.total_settle - total_cost);
}

// =============================================================================
// Share and Clamping Tests
// =============================================================================

#[test]
fn test_bigger_lines_carry_bigger_allowances() {
    let items = [line("90.00", "40.00", 1), line("10.00", "4.00", 1)];
    let alloc = allocate_cart_discount(&items, dec("100.00"), dec("90.00"));

    assert!(alloc.lines[0].allowance > alloc.lines[1].allowance);
    // Nine times the revenue share carries nine times the allowance.
    assert_eq!(
        alloc.lines[0].allowance,
        alloc.lines[1].allowance * dec("9")
    );
}

#[test]
fn test_quantity_counts_toward_share() {
    // Three units at $10 carry the same share as one unit at $30.
    let items = [line("10.00", "4.00", 3), line("30.00", "12.00", 1)];
    let alloc = allocate_cart_discount(&items, dec("60.00"), dec("48.00"));

    assert_eq!(alloc.lines[0].allowance, alloc.lines[1].allowance);
}

#[test]
fn test_full_giveaway_settles_at_zero() {
    // An offer of zero settles every line at zero and reports the full
    // cost as negative margin.
    let items = [line("25.00", "10.00", 2)];
    let alloc = allocate_cart_discount(&items, dec("50.00"), dec("0.00"));

    assert_eq!(alloc.lines[0].settle_price, Decimal::ZERO);
    assert_eq!(alloc.gross_margin, dec("-20.00"));
}

#[test]
fn test_premium_offer_raises_settle_prices() {
    // An offer above the cart total produces a negative delta and
    // negative allowances, raising each settle price.
    let items = [line("40.00", "15.00", 1)];
    let alloc = allocate_cart_discount(&items, dec("40.00"), dec("44.00"));

    assert_eq!(alloc.delta, dec("-4.00"));
    assert_eq!(alloc.lines[0].settle_price, dec("44.00"));
}
