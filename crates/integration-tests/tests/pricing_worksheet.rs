//! Integration tests for the bulk price editor adjustment math.
//!
//! Exercises the cost-plus pricing components through each adjustment
//! mode the way the pricebuilder worksheet drives them.

use rust_decimal::Decimal;

use offerdesk_core::pricing::{
    Allowances, FormulaPercents, PriceAdjustment, PricingComponents, is_material_change,
};

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

fn sample_row() -> PricingComponents {
    PricingComponents {
        cost: dec("40.00"),
        profit_markup: dec("15.00"),
        allowances: Allowances {
            discount: dec("2.00"),
            shrink: dec("0.50"),
            financing: dec("1.00"),
            shipping: dec("1.50"),
        },
        market_adjustment: dec("0.00"),
    }
}

// =============================================================================
// Adjustment Mode Tests
// =============================================================================

#[test]
fn test_percent_mode_hits_target_price() {
    let row = sample_row();
    let before = row.selling_price();
    let adjusted = PriceAdjustment::Percent { percent: dec("5") }.apply(&row);

    assert_eq!(
        adjusted.selling_price(),
        before * dec("1.05"),
        "percent mode must land exactly on the scaled price"
    );
}

#[test]
fn test_percent_mode_preserves_allowances() {
    let row = sample_row();
    let adjusted = PriceAdjustment::Percent { percent: dec("25") }.apply(&row);

    assert_eq!(adjusted.cost, row.cost);
    assert_eq!(adjusted.allowances, row.allowances);
    assert_eq!(adjusted.market_adjustment, row.market_adjustment);
}

#[test]
fn test_negative_percent_reduces_price() {
    let row = sample_row();
    let adjusted = PriceAdjustment::Percent {
        percent: dec("-10"),
    }
    .apply(&row);

    assert_eq!(adjusted.selling_price(), row.selling_price() * dec("0.90"));
}

#[test]
fn test_flat_mode_shifts_price_by_amount() {
    let row = sample_row();
    let adjusted = PriceAdjustment::Flat {
        amount: dec("2.25"),
    }
    .apply(&row);

    assert_eq!(adjusted.selling_price(), row.selling_price() + dec("2.25"));
    assert_eq!(adjusted.allowances, row.allowances);
}

#[test]
fn test_formula_mode_scales_with_cost() {
    let percents = FormulaPercents {
        profit_pct: dec("30"),
        discount_pct: dec("5"),
        shrink_pct: dec("1"),
        financing_pct: dec("2"),
        shipping_pct: dec("4"),
        market_pct: dec("-3"),
    };

    let cheap = PricingComponents {
        cost: dec("10.00"),
        ..PricingComponents::default()
    };
    let dear = PricingComponents {
        cost: dec("100.00"),
        ..PricingComponents::default()
    };

    let a = PriceAdjustment::Formula { percents }.apply(&cheap);
    let b = PriceAdjustment::Formula { percents }.apply(&dear);

    // Same percentages, ten times the cost, ten times every component.
    assert_eq!(b.profit_markup, a.profit_markup * Decimal::TEN);
    assert_eq!(b.allowances.total(), a.allowances.total() * Decimal::TEN);
    assert_eq!(b.market_adjustment, a.market_adjustment * Decimal::TEN);
}

#[test]
fn test_formula_mode_ignores_previous_components() {
    // Formula mode rebuilds everything from cost; the starting markup
    // and allowances must not leak through.
    let percents = FormulaPercents {
        profit_pct: dec("50"),
        ..FormulaPercents::default()
    };
    let from_scratch = PriceAdjustment::Formula { percents }.apply(&PricingComponents {
        cost: dec("40.00"),
        ..PricingComponents::default()
    });
    let from_sample = PriceAdjustment::Formula { percents }.apply(&sample_row());

    assert_eq!(from_scratch, from_sample);
    assert_eq!(from_sample.selling_price(), dec("60.00"));
}

// =============================================================================
// Change Detection Tests
// =============================================================================

#[test]
fn test_sub_cent_moves_are_not_changes() {
    let row = sample_row();
    // A 0% adjustment reproduces the current price exactly.
    let adjusted = PriceAdjustment::Percent { percent: dec("0") }.apply(&row);
    assert!(!is_material_change(
        row.selling_price(),
        adjusted.selling_price()
    ));
}

#[test]
fn test_one_cent_move_is_a_change() {
    assert!(is_material_change(dec("19.99"), dec("20.00")));
    assert!(is_material_change(dec("20.00"), dec("19.99")));
}
