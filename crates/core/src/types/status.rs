//! Status enums for orders, customers, and promotional entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are stored with a string-typed status column; this enum is the
/// typed view used at the edges. [`OrderStatus::normalize`] additionally
/// accepts the synonym spellings that the admin UI and legacy clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order. Used for fixed-bucket breakdowns.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Canonical string form, matching the stored column values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Normalize a raw status string, accepting known synonyms.
    ///
    /// - `delivered`, `complete` → `completed`
    /// - `in_process`, `in-progress` → `processing`
    /// - `shipping` → `shipped`
    /// - `canceled` → `cancelled`
    ///
    /// Returns `None` for unrecognized input. Matching is case-insensitive.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "processing" | "in_process" | "in-progress" | "in_progress" => Some(Self::Processing),
            "shipped" | "shipping" => Some(Self::Shipped),
            "completed" | "complete" | "delivered" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Customer account status (distinct from a pending admin user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Pending,
    Active,
    Blocked,
}

impl CustomerStatus {
    /// Canonical string form, matching the stored column values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CustomerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            other => Err(format!("invalid customer status: {other}")),
        }
    }
}

/// How a voucher value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Value is a percentage of the purchase amount.
    Percentage,
    /// Value is a fixed amount deducted from the purchase.
    Fixed,
}

impl DiscountType {
    /// Canonical string form, matching the stored column values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percentage" | "percent" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!("invalid discount type: {other}")),
        }
    }
}

/// Free-shipping promotion rule kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingRule {
    /// Waive shipping for a destination location.
    Location,
    /// Waive shipping above a minimum purchase amount.
    MinAmount,
    /// Waive shipping for products in a category.
    Category,
}

impl ShippingRule {
    /// Canonical string form, matching the stored column values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::MinAmount => "min_amount",
            Self::Category => "category",
        }
    }
}

impl std::str::FromStr for ShippingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "location" => Ok(Self::Location),
            "min_amount" | "minimum" => Ok(Self::MinAmount),
            "category" => Ok(Self::Category),
            other => Err(format!("invalid shipping rule: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_synonyms() {
        assert_eq!(
            OrderStatus::normalize("delivered"),
            Some(OrderStatus::Completed)
        );
        assert_eq!(
            OrderStatus::normalize("complete"),
            Some(OrderStatus::Completed)
        );
        assert_eq!(
            OrderStatus::normalize("shipping"),
            Some(OrderStatus::Shipped)
        );
        assert_eq!(
            OrderStatus::normalize("in_process"),
            Some(OrderStatus::Processing)
        );
        assert_eq!(
            OrderStatus::normalize("in-progress"),
            Some(OrderStatus::Processing)
        );
        assert_eq!(
            OrderStatus::normalize("canceled"),
            Some(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn test_normalize_case_insensitive() {
        assert_eq!(
            OrderStatus::normalize("  Delivered "),
            Some(OrderStatus::Completed)
        );
        assert_eq!(
            OrderStatus::normalize("PENDING"),
            Some(OrderStatus::Pending)
        );
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        assert_eq!(OrderStatus::normalize("refunded"), None);
        assert_eq!(OrderStatus::normalize(""), None);
    }

    #[test]
    fn test_canonical_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::normalize(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).expect("serialize");
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_discount_type_parse() {
        assert_eq!(
            "percentage".parse::<DiscountType>(),
            Ok(DiscountType::Percentage)
        );
        assert_eq!("fixed".parse::<DiscountType>(), Ok(DiscountType::Fixed));
        assert!("half-off".parse::<DiscountType>().is_err());
    }
}
