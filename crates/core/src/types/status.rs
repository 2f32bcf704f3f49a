//! Status enums for offers, carts, and programs.
//!
//! These mirror the Postgres enum types defined in the admin migrations.
//! The application layer reads and writes these values but does not
//! validate lifecycle transitions; those happen in the database layer.

use serde::{Deserialize, Serialize};

/// Offer lifecycle status.
///
/// Spans the automatic and manual accept/decline/counter lifecycle. An
/// offer arrives as `Pending` and is either resolved automatically by the
/// program rules (`Auto*` variants) or manually by the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "offer_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Offer submitted, awaiting evaluation.
    #[default]
    Pending,
    /// Accepted automatically by program rules.
    AutoAccepted,
    /// Declined automatically by program rules.
    AutoDeclined,
    /// Countered automatically by program rules.
    AutoCountered,
    /// Accepted manually by the merchant.
    Accepted,
    /// Declined manually by the merchant.
    Declined,
    /// Countered manually by the merchant.
    Countered,
    /// Consumer completed checkout against the offered price.
    CheckedOut,
    /// Offer expired before resolution.
    Expired,
    /// Withdrawn by the consumer.
    Cancelled,
}

impl OfferStatus {
    /// All statuses, in display order (used to populate filter dropdowns
    /// when the enum cache is unavailable).
    pub const ALL: [Self; 10] = [
        Self::Pending,
        Self::AutoAccepted,
        Self::AutoDeclined,
        Self::AutoCountered,
        Self::Accepted,
        Self::Declined,
        Self::Countered,
        Self::CheckedOut,
        Self::Expired,
        Self::Cancelled,
    ];

    /// Whether the offer has been accepted (automatically or manually).
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::AutoAccepted | Self::Accepted | Self::CheckedOut)
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::AutoAccepted => "auto_accepted",
            Self::AutoDeclined => "auto_declined",
            Self::AutoCountered => "auto_countered",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Countered => "countered",
            Self::CheckedOut => "checked_out",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OfferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "auto_accepted" => Ok(Self::AutoAccepted),
            "auto_declined" => Ok(Self::AutoDeclined),
            "auto_countered" => Ok(Self::AutoCountered),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "countered" => Ok(Self::Countered),
            "checked_out" => Ok(Self::CheckedOut),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid offer status: {s}")),
        }
    }
}

/// Cart aggregate status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "cart_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Abandoned,
    Offered,
    Checkout,
    Expired,
    ClosedWon,
    ClosedLost,
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Abandoned => "abandoned",
            Self::Offered => "offered",
            Self::Checkout => "checkout",
            Self::Expired => "expired",
            Self::ClosedWon => "closed_won",
            Self::ClosedLost => "closed_lost",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CartStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abandoned" => Ok(Self::Abandoned),
            "offered" => Ok(Self::Offered),
            "checkout" => Ok(Self::Checkout),
            "expired" => Ok(Self::Expired),
            "closed_won" => Ok(Self::ClosedWon),
            "closed_lost" => Ok(Self::ClosedLost),
            _ => Err(format!("invalid cart status: {s}")),
        }
    }
}

/// What a program optimizes for when evaluating offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "program_focus", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProgramFocus {
    #[default]
    Conversion,
    Margin,
    Clearance,
    Loyalty,
}

impl std::fmt::Display for ProgramFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Conversion => "conversion",
            Self::Margin => "margin",
            Self::Clearance => "clearance",
            Self::Loyalty => "loyalty",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ProgramFocus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversion" => Ok(Self::Conversion),
            "margin" => Ok(Self::Margin),
            "clearance" => Ok(Self::Clearance),
            "loyalty" => Ok(Self::Loyalty),
            _ => Err(format!("invalid program focus: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_offer_status_roundtrip() {
        for status in OfferStatus::ALL {
            let parsed = OfferStatus::from_str(&status.to_string());
            assert_eq!(parsed, Ok(status));
        }
    }

    #[test]
    fn test_offer_status_invalid() {
        assert!(OfferStatus::from_str("haggled").is_err());
    }

    #[test]
    fn test_offer_status_accepted() {
        assert!(OfferStatus::AutoAccepted.is_accepted());
        assert!(OfferStatus::Accepted.is_accepted());
        assert!(OfferStatus::CheckedOut.is_accepted());
        assert!(!OfferStatus::Countered.is_accepted());
        assert!(!OfferStatus::Pending.is_accepted());
    }

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
}
