//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

fn format_money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// Format a decimal as a dollar amount with two places.
///
/// Usage in templates: `{{ offer.cart_total|money }}`
#[askama::filter_fn]
pub fn money(value: &Decimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(*value))
}

/// Format an optional decimal as a dollar amount, or a dash.
///
/// Usage in templates: `{{ campaign.budget|money_opt }}`
#[askama::filter_fn]
pub fn money_opt(value: &Option<Decimal>, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.map_or_else(|| "\u{2014}".to_string(), format_money))
}

/// Format a decimal fraction as a percentage with one place.
///
/// Usage in templates: `{{ allocation.gross_margin|percent }}`
#[askama::filter_fn]
pub fn percent(value: &Decimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{:.1}%", (value * Decimal::from(100)).round_dp(1)))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(format_money(Decimal::from(80)), "$80.00");
        assert_eq!(format_money(Decimal::from_str("12.345").unwrap()), "$12.35");
    }

    #[test]
    fn money_pads_single_place() {
        assert_eq!(format_money(Decimal::from_str("5.5").unwrap()), "$5.50");
    }
}
