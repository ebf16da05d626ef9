//! Promotional entities: vouchers, discounts, flash sales, free shipping.
//!
//! "Currently applicable" is derived, not stored: a promotion applies when
//! `is_active` is set AND the current instant falls inside its
//! `[start_date, end_date]` window.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_core::{
    DiscountType, FlashSaleId, ProductDiscountId, ProductId, ProductVoucherId, PromotionId,
    ShippingRule, VoucherId,
};

/// Whether an activity window covers the given instant.
#[must_use]
pub fn within_window(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= now && now <= end
}

/// A store-wide voucher code.
#[derive(Debug, Clone, Serialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Voucher {
    /// Derived applicability at `now`.
    #[must_use]
    pub fn is_currently_active(&self, now: DateTime<Utc>) -> bool {
        self.is_active && within_window(now, self.start_date, self.end_date)
    }
}

/// A voucher scoped to a single product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVoucher {
    pub id: ProductVoucherId,
    pub product_id: ProductId,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl ProductVoucher {
    /// Derived applicability at `now`.
    #[must_use]
    pub fn is_currently_active(&self, now: DateTime<Utc>) -> bool {
        self.is_active && within_window(now, self.start_date, self.end_date)
    }
}

/// A time-boxed percentage discount on one product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDiscount {
    pub id: ProductDiscountId,
    pub product_id: ProductId,
    pub discount_percent: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl ProductDiscount {
    /// Derived applicability at `now`.
    #[must_use]
    pub fn is_currently_active(&self, now: DateTime<Utc>) -> bool {
        self.is_active && within_window(now, self.start_date, self.end_date)
    }
}

/// A store-wide, time-boxed percentage discount campaign.
#[derive(Debug, Clone, Serialize)]
pub struct FlashSale {
    pub id: FlashSaleId,
    pub title: String,
    pub discount_percent: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl FlashSale {
    /// Derived applicability at `now`.
    #[must_use]
    pub fn is_currently_active(&self, now: DateTime<Utc>) -> bool {
        self.is_active && within_window(now, self.start_date, self.end_date)
    }
}

/// A rule waiving shipping cost, with an optional usage cap.
#[derive(Debug, Clone, Serialize)]
pub struct FreeShippingPromotion {
    pub id: PromotionId,
    pub title: String,
    pub rule_type: ShippingRule,
    /// Rule operand: a location name or category name, depending on
    /// `rule_type`; unused for `min_amount` rules.
    pub rule_value: String,
    pub min_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl FreeShippingPromotion {
    /// Derived applicability at `now`: active flag, window, and usage cap.
    #[must_use]
    pub fn is_currently_active(&self, now: DateTime<Utc>) -> bool {
        let capped = self
            .usage_limit
            .is_some_and(|limit| self.usage_count >= limit);
        self.is_active && !capped && within_window(now, self.start_date, self.end_date)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn voucher(start: DateTime<Utc>, end: DateTime<Utc>, is_active: bool) -> Voucher {
        Voucher {
            id: VoucherId::new(1),
            code: "WELCOME10".to_owned(),
            discount_type: DiscountType::Percentage,
            value: Decimal::new(10, 0),
            min_purchase: None,
            usage_limit: None,
            usage_count: 0,
            start_date: start,
            end_date: end,
            is_active,
        }
    }

    #[test]
    fn test_applicability_is_derived_from_window_and_flag() {
        let v = voucher(at(2026, 1, 1), at(2026, 1, 31), true);
        assert!(v.is_currently_active(at(2026, 1, 15)));
        assert!(!v.is_currently_active(at(2026, 2, 1)));
        assert!(!v.is_currently_active(at(2025, 12, 31)));

        let inactive = voucher(at(2026, 1, 1), at(2026, 1, 31), false);
        assert!(!inactive.is_currently_active(at(2026, 1, 15)));
    }

    #[test]
    fn test_window_is_inclusive() {
        let start = at(2026, 1, 1);
        let end = at(2026, 1, 31);
        assert!(within_window(start, start, end));
        assert!(within_window(end, start, end));
    }

    #[test]
    fn test_free_shipping_usage_cap() {
        let promo = FreeShippingPromotion {
            id: PromotionId::new(1),
            title: "Jakarta free shipping".to_owned(),
            rule_type: ShippingRule::Location,
            rule_value: "Jakarta".to_owned(),
            min_amount: None,
            usage_limit: Some(2),
            usage_count: 2,
            start_date: at(2026, 1, 1),
            end_date: at(2026, 12, 31),
            is_active: true,
        };
        assert!(!promo.is_currently_active(at(2026, 6, 1)));
    }
}
