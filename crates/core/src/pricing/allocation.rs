//! Cart-discount allocation across line items.
//!
//! When a merchant views an accepted offer, the gap between the cart total
//! and the offered price is spread across line items proportionally to
//! each item's share of total sell price:
//!
//! ```text
//! allowance_i    = (line_total_i / total_sell) * delta    (total_sell > 0, else 0)
//! settle_price_i = max(line_total_i - allowance_i, 0)
//! profit_i       = settle_price_i - line_cost_i
//! ```
//!
//! The result is the paired Selling/Settle row view with a gross-margin
//! total. Nothing is persisted; the allocation is recomputed per page view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Input line item for an allocation: per-unit price/cost and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferLine {
    pub unit_price: Decimal,
    pub unit_cost: Decimal,
    pub quantity: i32,
}

impl OfferLine {
    /// Total sell price for the line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Total cost for the line (`unit_cost * quantity`).
    #[must_use]
    pub fn line_cost(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }
}

/// One line of the Selling/Settle view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedLine {
    /// Original sell total for the line.
    pub line_total: Decimal,
    /// Portion of the cart-level discount carried by this line.
    pub allowance: Decimal,
    /// Post-discount settle price, clamped at zero.
    pub settle_price: Decimal,
    /// Settle price minus line cost; may be negative.
    pub profit: Decimal,
}

/// Allocation of a cart-level discount across its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAllocation {
    pub lines: Vec<AllocatedLine>,
    /// Sum of line sell totals.
    pub total_sell: Decimal,
    /// `cart_total - offer_price`; the amount being allocated.
    pub delta: Decimal,
    /// Sum of settle prices.
    pub total_settle: Decimal,
    /// Sum of per-line profits.
    pub gross_margin: Decimal,
}

/// Allocate `cart_total - offer_price` across `items` by revenue share.
///
/// When the total sell price is zero every allowance is zero (no division
/// by zero); settle prices are clamped at zero regardless of how large the
/// delta is.
#[must_use]
pub fn allocate_cart_discount(
    items: &[OfferLine],
    cart_total: Decimal,
    offer_price: Decimal,
) -> CartAllocation {
    let delta = cart_total - offer_price;
    let total_sell: Decimal = items.iter().map(OfferLine::line_total).sum();

    let lines: Vec<AllocatedLine> = items
        .iter()
        .map(|item| {
            let line_total = item.line_total();
            let allowance = if total_sell > Decimal::ZERO {
                line_total / total_sell * delta
            } else {
                Decimal::ZERO
            };
            let settle_price = (line_total - allowance).max(Decimal::ZERO);
            let profit = settle_price - item.line_cost();
            AllocatedLine {
                line_total,
                allowance,
                settle_price,
                profit,
            }
        })
        .collect();

    let total_settle = lines.iter().map(|l| l.settle_price).sum();
    let gross_margin = lines.iter().map(|l| l.profit).sum();

    CartAllocation {
        lines,
        total_sell,
        delta,
        total_settle,
        gross_margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_worked_example() {
        // Cart total $100, offer $80, two items each selling $50:
        // each line absorbs a $10 allowance and settles at $40.
        let items = [line("50.00", "30.00", 1), line("50.00", "30.00", 1)];
        let alloc = allocate_cart_discount(&items, dec("100.00"), dec("80.00"));

        assert_eq!(alloc.delta, dec("20.00"));
        assert_eq!(alloc.lines[0].allowance, dec("10.00"));
        assert_eq!(alloc.lines[1].allowance, dec("10.00"));
        assert_eq!(alloc.lines[0].settle_price, dec("40.00"));
        assert_eq!(alloc.lines[1].settle_price, dec("40.00"));
        assert_eq!(alloc.gross_margin, dec("20.00"));
    }

    #[test]
    fn test_allocation_conserves_delta() {
        let items = [
            line("19.99", "8.00", 3),
            line("7.49", "2.10", 1),
            line("104.95", "61.20", 2),
            line("0.99", "0.10", 7),
        ];
        let cart_total: Decimal = items.iter().map(OfferLine::line_total).sum();
        let offer = cart_total - dec("41.37");
        let alloc = allocate_cart_discount(&items, cart_total, offer);

        let allocated: Decimal = alloc.lines.iter().map(|l| l.allowance).sum();
        assert!(
            (allocated - alloc.delta).abs() <= CENT,
            "allocated {allocated} vs delta {}",
            alloc.delta
        );
    }

    #[test]
    fn test_settle_prices_never_negative() {
        // Offer price far below zero forces a delta larger than total sell.
        let items = [line("10.00", "4.00", 1), line("5.00", "1.00", 2)];
        let alloc = allocate_cart_discount(&items, dec("20.00"), dec("-500.00"));

        for l in &alloc.lines {
            assert!(l.settle_price >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_zero_sell_price_is_safe() {
        let items = [line("0.00", "1.00", 2), line("0.00", "0.50", 1)];
        let alloc = allocate_cart_discount(&items, dec("0.00"), dec("-10.00"));

        assert_eq!(alloc.total_sell, Decimal::ZERO);
        for l in &alloc.lines {
            assert_eq!(l.allowance, Decimal::ZERO);
        }
    }

    #[test]
    fn test_empty_cart() {
        let alloc = allocate_cart_discount(&[], dec("0.00"), dec("0.00"));
        assert!(alloc.lines.is_empty());
        assert_eq!(alloc.gross_margin, Decimal::ZERO);
    }

    #[test]
    fn test_profit_reflects_cost() {
        let items = [line("50.00", "45.00", 1)];
        let alloc = allocate_cart_discount(&items, dec("50.00"), dec("40.00"));
        // Settles at 40, cost 45: negative margin is reported, not clamped.
        assert_eq!(alloc.lines[0].settle_price, dec("40.00"));
        assert_eq!(alloc.lines[0].profit, dec("-5.00"));
    }

    #[test]
    fn test_allocation_proportional_to_share() {
        let items = [line("75.00", "30.00", 1), line("25.00", "10.00", 1)];
        let alloc = allocate_cart_discount(&items, dec("100.00"), dec("60.00"));

        // 75% and 25% shares of a $40 delta.
        assert_eq!(alloc.lines[0].allowance, dec("30.00"));
        assert_eq!(alloc.lines[1].allowance, dec("10.00"));
    }
}
