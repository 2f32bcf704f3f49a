//! Pricing math for OfferDesk.
//!
//! Two independent pieces of pure arithmetic:
//!
//! - [`cost_plus`] - selling price built up from cost, profit markup, and
//!   allowance components, with the three bulk-edit adjustment modes.
//! - [`allocation`] - distribution of a cart-level offer discount across
//!   line items proportionally to revenue share.
//!
//! All money values are [`rust_decimal::Decimal`]; nothing here performs
//! I/O or rounding for display (templates round via filters).

pub mod allocation;
pub mod cost_plus;

pub use allocation::{AllocatedLine, CartAllocation, OfferLine, allocate_cart_discount};
pub use cost_plus::{
    Allowances, FormulaPercents, PriceAdjustment, PricingComponents, is_material_change,
};
