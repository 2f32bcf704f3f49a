//! Cost-plus selling price computation.
//!
//! A variant's selling price is built up from its cost basis:
//!
//! ```text
//! selling_price = cost + profit_markup + Σ(allowances) + market_adjustment
//! ```
//!
//! The bulk price editor recomputes rows with one of three adjustment
//! modes; see [`PriceAdjustment`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum selling-price movement that counts as a change ($0.01).
///
/// Rows whose recomputed price moves by less than one cent are excluded
/// from the bulk editor's "has changes" count.
const CHANGE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Named allowance deductions applied on top of cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allowances {
    pub discount: Decimal,
    pub shrink: Decimal,
    pub financing: Decimal,
    pub shipping: Decimal,
}

impl Allowances {
    /// Sum of all allowance components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.discount + self.shrink + self.financing + self.shipping
    }
}

/// The full component breakdown of a variant's selling price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PricingComponents {
    /// Cost basis (landed cost per unit).
    pub cost: Decimal,
    /// Profit markup in dollars.
    pub profit_markup: Decimal,
    /// Allowance components in dollars.
    pub allowances: Allowances,
    /// Signed market adjustment in dollars.
    pub market_adjustment: Decimal,
}

impl PricingComponents {
    /// Compute the selling price from the components.
    #[must_use]
    pub fn selling_price(&self) -> Decimal {
        self.cost + self.profit_markup + self.allowances.total() + self.market_adjustment
    }
}

/// Every component expressed as a percentage of cost, for formula mode.
///
/// Percentages are whole numbers: `10` means 10% of cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormulaPercents {
    pub profit_pct: Decimal,
    pub discount_pct: Decimal,
    pub shrink_pct: Decimal,
    pub financing_pct: Decimal,
    pub shipping_pct: Decimal,
    pub market_pct: Decimal,
}

/// Bulk price editor adjustment modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PriceAdjustment {
    /// Percentage markup applied to the current selling price. The profit
    /// markup is re-derived as the residual after subtracting cost and the
    /// existing allowances from the target price.
    Percent { percent: Decimal },
    /// Flat dollar amount added to the profit markup only.
    Flat { amount: Decimal },
    /// Every component recomputed independently as a percentage of cost.
    Formula { percents: FormulaPercents },
}

impl PriceAdjustment {
    /// Apply this adjustment to the current components, producing the new
    /// component breakdown.
    #[must_use]
    pub fn apply(&self, current: &PricingComponents) -> PricingComponents {
        match self {
            Self::Percent { percent } => {
                let target = current.selling_price()
                    * (Decimal::ONE + *percent / Decimal::ONE_HUNDRED);
                // Allowances and market adjustment stay fixed; profit
                // markup absorbs the difference.
                let residual = target
                    - current.cost
                    - current.allowances.total()
                    - current.market_adjustment;
                PricingComponents {
                    profit_markup: residual,
                    ..*current
                }
            }
            Self::Flat { amount } => PricingComponents {
                profit_markup: current.profit_markup + *amount,
                ..*current
            },
            Self::Formula { percents } => {
                let of_cost = |pct: Decimal| current.cost * pct / Decimal::ONE_HUNDRED;
                PricingComponents {
                    cost: current.cost,
                    profit_markup: of_cost(percents.profit_pct),
                    allowances: Allowances {
                        discount: of_cost(percents.discount_pct),
                        shrink: of_cost(percents.shrink_pct),
                        financing: of_cost(percents.financing_pct),
                        shipping: of_cost(percents.shipping_pct),
                    },
                    market_adjustment: of_cost(percents.market_pct),
                }
            }
        }
    }
}

/// Whether a selling-price move is large enough to count as a change.
///
/// Moves of less than one cent are ignored.
#[must_use]
pub fn is_material_change(old_price: Decimal, new_price: Decimal) -> bool {
    (new_price - old_price).abs() >= CHANGE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn components() -> PricingComponents {
        PricingComponents {
            cost: dec("50.00"),
            profit_markup: dec("20.00"),
            allowances: Allowances {
                discount: dec("5.00"),
                shrink: dec("1.00"),
                financing: dec("2.00"),
                shipping: dec("4.00"),
            },
            market_adjustment: dec("-2.00"),
        }
    }

    #[test]
    fn test_selling_price_sum() {
        // 50 + 20 + (5+1+2+4) - 2 = 80
        assert_eq!(components().selling_price(), dec("80.00"));
    }

    #[test]
    fn test_percent_mode_rederives_profit_markup() {
        let current = components();
        let adjusted = PriceAdjustment::Percent {
            percent: dec("10"),
        }
        .apply(&current);

        // Target price is 80 * 1.10 = 88; allowances and market adjustment
        // are untouched, so profit markup becomes the residual.
        assert_eq!(adjusted.selling_price(), dec("88.00"));
        assert_eq!(adjusted.allowances, current.allowances);
        assert_eq!(adjusted.market_adjustment, current.market_adjustment);
        assert_eq!(adjusted.profit_markup, dec("28.00"));
    }

    #[test]
    fn test_flat_mode_touches_profit_markup_only() {
        let current = components();
        let adjusted = PriceAdjustment::Flat {
            amount: dec("3.50"),
        }
        .apply(&current);

        assert_eq!(adjusted.profit_markup, dec("23.50"));
        assert_eq!(adjusted.allowances, current.allowances);
        assert_eq!(adjusted.selling_price(), dec("83.50"));
    }

    #[test]
    fn test_formula_mode_recomputes_from_cost() {
        let current = components();
        let adjusted = PriceAdjustment::Formula {
            percents: FormulaPercents {
                profit_pct: dec("40"),
                discount_pct: dec("10"),
                shrink_pct: dec("2"),
                financing_pct: dec("3"),
                shipping_pct: dec("5"),
                market_pct: dec("0"),
            },
        }
        .apply(&current);

        assert_eq!(adjusted.profit_markup, dec("20.00"));
        assert_eq!(adjusted.allowances.discount, dec("5.00"));
        assert_eq!(adjusted.allowances.shrink, dec("1.00"));
        assert_eq!(adjusted.allowances.financing, dec("1.50"));
        assert_eq!(adjusted.allowances.shipping, dec("2.50"));
        assert_eq!(adjusted.market_adjustment, Decimal::ZERO);
        assert_eq!(adjusted.selling_price(), dec("80.00"));
    }

    #[test]
    fn test_formula_mode_components_independent() {
        // Changing one allowance percentage must not change any other
        // computed component for a fixed cost.
        let current = components();
        let base = FormulaPercents {
            profit_pct: dec("40"),
            discount_pct: dec("10"),
            shrink_pct: dec("2"),
            financing_pct: dec("3"),
            shipping_pct: dec("5"),
            market_pct: dec("1"),
        };
        let bumped = FormulaPercents {
            shrink_pct: dec("8"),
            ..base
        };

        let a = PriceAdjustment::Formula { percents: base }.apply(&current);
        let b = PriceAdjustment::Formula { percents: bumped }.apply(&current);

        assert_ne!(a.allowances.shrink, b.allowances.shrink);
        assert_eq!(a.profit_markup, b.profit_markup);
        assert_eq!(a.allowances.discount, b.allowances.discount);
        assert_eq!(a.allowances.financing, b.allowances.financing);
        assert_eq!(a.allowances.shipping, b.allowances.shipping);
        assert_eq!(a.market_adjustment, b.market_adjustment);
    }

    #[test]
    fn test_change_epsilon_boundary() {
        // A move of $0.009 is below the one-cent threshold; $0.011 is above.
        assert!(!is_material_change(dec("10.000"), dec("10.009")));
        assert!(is_material_change(dec("10.000"), dec("10.011")));
        // Exactly one cent counts as changed.
        assert!(is_material_change(dec("10.00"), dec("10.01")));
        // Direction does not matter.
        assert!(!is_material_change(dec("10.009"), dec("10.000")));
    }

    #[test]
    fn test_zero_cost_formula_mode() {
        let current = PricingComponents::default();
        let adjusted = PriceAdjustment::Formula {
            percents: FormulaPercents {
                profit_pct: dec("40"),
                ..FormulaPercents::default()
            },
        }
        .apply(&current);
        assert_eq!(adjusted.selling_price(), Decimal::ZERO);
    }
}
