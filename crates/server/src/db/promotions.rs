//! Promotion repositories: vouchers, product vouchers, product discounts,
//! flash sales, and free-shipping promotions.
//!
//! Voucher redemption increments `usage_count` with a single atomic UPDATE
//! guarded by the usage limit in the WHERE clause, so concurrent redemptions
//! cannot overshoot the cap.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use backoffice_core::{
    DiscountType, FlashSaleId, ProductDiscountId, ProductId, ProductVoucherId, PromotionId,
    ShippingRule, VoucherId,
};

use super::{RepositoryError, map_unique_violation};
use crate::models::promotion::{
    FlashSale, FreeShippingPromotion, ProductDiscount, ProductVoucher, Voucher,
};

fn parse_discount_type(raw: &str) -> Result<DiscountType, RepositoryError> {
    raw.parse()
        .map_err(|e: String| RepositoryError::DataCorruption(e))
}

fn parse_shipping_rule(raw: &str) -> Result<ShippingRule, RepositoryError> {
    raw.parse()
        .map_err(|e: String| RepositoryError::DataCorruption(e))
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct VoucherRow {
    id: i32,
    code: String,
    discount_type: String,
    value: Decimal,
    min_purchase: Option<Decimal>,
    usage_limit: Option<i32>,
    usage_count: i32,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
}

impl TryFrom<VoucherRow> for Voucher {
    type Error = RepositoryError;

    fn try_from(row: VoucherRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VoucherId::new(row.id),
            code: row.code,
            discount_type: parse_discount_type(&row.discount_type)?,
            value: row.value,
            min_purchase: row.min_purchase,
            usage_limit: row.usage_limit,
            usage_count: row.usage_count,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductVoucherRow {
    id: i32,
    product_id: i32,
    code: String,
    discount_type: String,
    value: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
}

impl TryFrom<ProductVoucherRow> for ProductVoucher {
    type Error = RepositoryError;

    fn try_from(row: ProductVoucherRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductVoucherId::new(row.id),
            product_id: ProductId::new(row.product_id),
            code: row.code,
            discount_type: parse_discount_type(&row.discount_type)?,
            value: row.value,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductDiscountRow {
    id: i32,
    product_id: i32,
    discount_percent: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
}

impl From<ProductDiscountRow> for ProductDiscount {
    fn from(row: ProductDiscountRow) -> Self {
        Self {
            id: ProductDiscountId::new(row.id),
            product_id: ProductId::new(row.product_id),
            discount_percent: row.discount_percent,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FlashSaleRow {
    id: i32,
    title: String,
    discount_percent: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
}

impl From<FlashSaleRow> for FlashSale {
    fn from(row: FlashSaleRow) -> Self {
        Self {
            id: FlashSaleId::new(row.id),
            title: row.title,
            discount_percent: row.discount_percent,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FreeShippingRow {
    id: i32,
    title: String,
    rule_type: String,
    rule_value: String,
    min_amount: Option<Decimal>,
    usage_limit: Option<i32>,
    usage_count: i32,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
}

impl TryFrom<FreeShippingRow> for FreeShippingPromotion {
    type Error = RepositoryError;

    fn try_from(row: FreeShippingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PromotionId::new(row.id),
            title: row.title,
            rule_type: parse_shipping_rule(&row.rule_type)?,
            rule_value: row.rule_value,
            min_amount: row.min_amount,
            usage_limit: row.usage_limit,
            usage_count: row.usage_count,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
        })
    }
}

// =============================================================================
// Input Types
// =============================================================================

/// Fields for creating or updating a store-wide voucher.
#[derive(Debug, Clone)]
pub struct VoucherInput {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Fields for creating or updating a product voucher.
#[derive(Debug, Clone)]
pub struct ProductVoucherInput {
    pub product_id: ProductId,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Fields for creating or updating a product discount.
#[derive(Debug, Clone)]
pub struct ProductDiscountInput {
    pub product_id: ProductId,
    pub discount_percent: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Fields for creating or updating a flash sale.
#[derive(Debug, Clone)]
pub struct FlashSaleInput {
    pub title: String,
    pub discount_percent: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Fields for creating or updating a free-shipping promotion.
#[derive(Debug, Clone)]
pub struct FreeShippingInput {
    pub title: String,
    pub rule_type: ShippingRule,
    pub rule_value: String,
    pub min_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for all promotional entities.
pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Vouchers
    // =========================================================================

    /// List all vouchers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_vouchers(&self) -> Result<Vec<Voucher>, RepositoryError> {
        let rows = sqlx::query_as::<_, VoucherRow>(
            r"
            SELECT id, code, discount_type, value, min_purchase, usage_limit,
                   usage_count, start_date, end_date, is_active
            FROM store.voucher
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a voucher by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_voucher(&self, id: VoucherId) -> Result<Option<Voucher>, RepositoryError> {
        let row = sqlx::query_as::<_, VoucherRow>(
            r"
            SELECT id, code, discount_type, value, min_purchase, usage_limit,
                   usage_count, start_date, end_date, is_active
            FROM store.voucher
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    pub async fn create_voucher(&self, input: &VoucherInput) -> Result<Voucher, RepositoryError> {
        let row = sqlx::query_as::<_, VoucherRow>(
            r"
            INSERT INTO store.voucher
                (code, discount_type, value, min_purchase, usage_limit,
                 start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, code, discount_type, value, min_purchase, usage_limit,
                      usage_count, start_date, end_date, is_active
            ",
        )
        .bind(&input.code)
        .bind(input.discount_type.as_str())
        .bind(input.value)
        .bind(input.min_purchase)
        .bind(input.usage_limit)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "voucher code already exists"))?;

        row.try_into()
    }

    /// Update a voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the voucher doesn't exist.
    pub async fn update_voucher(
        &self,
        id: VoucherId,
        input: &VoucherInput,
    ) -> Result<Voucher, RepositoryError> {
        let row = sqlx::query_as::<_, VoucherRow>(
            r"
            UPDATE store.voucher
            SET code = $1, discount_type = $2, value = $3, min_purchase = $4,
                usage_limit = $5, start_date = $6, end_date = $7, is_active = $8
            WHERE id = $9
            RETURNING id, code, discount_type, value, min_purchase, usage_limit,
                      usage_count, start_date, end_date, is_active
            ",
        )
        .bind(&input.code)
        .bind(input.discount_type.as_str())
        .bind(input.value)
        .bind(input.min_purchase)
        .bind(input.usage_limit)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "voucher code already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the voucher doesn't exist.
    pub async fn delete_voucher(&self, id: VoucherId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.voucher WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Redeem a voucher by code: one atomic increment, guarded by the active
    /// flag, the activity window, and the usage limit. Returns the voucher
    /// when redemption succeeded, `None` when the code exists but is not
    /// currently redeemable, and `NotFound` for an unknown code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown code.
    pub async fn redeem_voucher(&self, code: &str) -> Result<Option<Voucher>, RepositoryError> {
        let row = sqlx::query_as::<_, VoucherRow>(
            r"
            UPDATE store.voucher
            SET usage_count = usage_count + 1
            WHERE code = $1
              AND is_active
              AND now() BETWEEN start_date AND end_date
              AND (usage_limit IS NULL OR usage_count < usage_limit)
            RETURNING id, code, discount_type, value, min_purchase, usage_limit,
                      usage_count, start_date, end_date, is_active
            ",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.try_into()?)),
            None => {
                let exists =
                    sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM store.voucher WHERE code = $1")
                        .bind(code)
                        .fetch_one(self.pool)
                        .await?;
                if exists == 0 {
                    Err(RepositoryError::NotFound)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Vouchers currently applicable (active, inside window, under cap).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_vouchers(&self) -> Result<Vec<Voucher>, RepositoryError> {
        let rows = sqlx::query_as::<_, VoucherRow>(
            r"
            SELECT id, code, discount_type, value, min_purchase, usage_limit,
                   usage_count, start_date, end_date, is_active
            FROM store.voucher
            WHERE is_active
              AND now() BETWEEN start_date AND end_date
              AND (usage_limit IS NULL OR usage_count < usage_limit)
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    // =========================================================================
    // Product vouchers
    // =========================================================================

    /// List all product vouchers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_product_vouchers(&self) -> Result<Vec<ProductVoucher>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductVoucherRow>(
            r"
            SELECT id, product_id, code, discount_type, value, start_date, end_date, is_active
            FROM store.product_voucher
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a product voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    pub async fn create_product_voucher(
        &self,
        input: &ProductVoucherInput,
    ) -> Result<ProductVoucher, RepositoryError> {
        let row = sqlx::query_as::<_, ProductVoucherRow>(
            r"
            INSERT INTO store.product_voucher
                (product_id, code, discount_type, value, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, product_id, code, discount_type, value, start_date, end_date, is_active
            ",
        )
        .bind(input.product_id.as_i32())
        .bind(&input.code)
        .bind(input.discount_type.as_str())
        .bind(input.value)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "voucher code already exists"))?;

        row.try_into()
    }

    /// Update a product voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn update_product_voucher(
        &self,
        id: ProductVoucherId,
        input: &ProductVoucherInput,
    ) -> Result<ProductVoucher, RepositoryError> {
        let row = sqlx::query_as::<_, ProductVoucherRow>(
            r"
            UPDATE store.product_voucher
            SET product_id = $1, code = $2, discount_type = $3, value = $4,
                start_date = $5, end_date = $6, is_active = $7
            WHERE id = $8
            RETURNING id, product_id, code, discount_type, value, start_date, end_date, is_active
            ",
        )
        .bind(input.product_id.as_i32())
        .bind(&input.code)
        .bind(input.discount_type.as_str())
        .bind(input.value)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "voucher code already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a product voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn delete_product_voucher(&self, id: ProductVoucherId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.product_voucher WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Product discounts
    // =========================================================================

    /// List all product discounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_product_discounts(&self) -> Result<Vec<ProductDiscount>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductDiscountRow>(
            r"
            SELECT id, product_id, discount_percent, start_date, end_date, is_active
            FROM store.product_discount
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a product discount.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_product_discount(
        &self,
        input: &ProductDiscountInput,
    ) -> Result<ProductDiscount, RepositoryError> {
        let row = sqlx::query_as::<_, ProductDiscountRow>(
            r"
            INSERT INTO store.product_discount
                (product_id, discount_percent, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, discount_percent, start_date, end_date, is_active
            ",
        )
        .bind(input.product_id.as_i32())
        .bind(input.discount_percent)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a product discount.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn update_product_discount(
        &self,
        id: ProductDiscountId,
        input: &ProductDiscountInput,
    ) -> Result<ProductDiscount, RepositoryError> {
        let row = sqlx::query_as::<_, ProductDiscountRow>(
            r"
            UPDATE store.product_discount
            SET product_id = $1, discount_percent = $2, start_date = $3,
                end_date = $4, is_active = $5
            WHERE id = $6
            RETURNING id, product_id, discount_percent, start_date, end_date, is_active
            ",
        )
        .bind(input.product_id.as_i32())
        .bind(input.discount_percent)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product discount.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn delete_product_discount(
        &self,
        id: ProductDiscountId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.product_discount WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Flash sales
    // =========================================================================

    /// List all flash sales, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_flash_sales(&self) -> Result<Vec<FlashSale>, RepositoryError> {
        let rows = sqlx::query_as::<_, FlashSaleRow>(
            r"
            SELECT id, title, discount_percent, start_date, end_date, is_active
            FROM store.flash_sale
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Flash sales currently applicable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_flash_sales(&self) -> Result<Vec<FlashSale>, RepositoryError> {
        let rows = sqlx::query_as::<_, FlashSaleRow>(
            r"
            SELECT id, title, discount_percent, start_date, end_date, is_active
            FROM store.flash_sale
            WHERE is_active AND now() BETWEEN start_date AND end_date
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a flash sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_flash_sale(
        &self,
        input: &FlashSaleInput,
    ) -> Result<FlashSale, RepositoryError> {
        let row = sqlx::query_as::<_, FlashSaleRow>(
            r"
            INSERT INTO store.flash_sale (title, discount_percent, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, discount_percent, start_date, end_date, is_active
            ",
        )
        .bind(&input.title)
        .bind(input.discount_percent)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a flash sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn update_flash_sale(
        &self,
        id: FlashSaleId,
        input: &FlashSaleInput,
    ) -> Result<FlashSale, RepositoryError> {
        let row = sqlx::query_as::<_, FlashSaleRow>(
            r"
            UPDATE store.flash_sale
            SET title = $1, discount_percent = $2, start_date = $3,
                end_date = $4, is_active = $5
            WHERE id = $6
            RETURNING id, title, discount_percent, start_date, end_date, is_active
            ",
        )
        .bind(&input.title)
        .bind(input.discount_percent)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a flash sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn delete_flash_sale(&self, id: FlashSaleId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.flash_sale WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Free-shipping promotions
    // =========================================================================

    /// List all free-shipping promotions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_free_shipping(
        &self,
    ) -> Result<Vec<FreeShippingPromotion>, RepositoryError> {
        let rows = sqlx::query_as::<_, FreeShippingRow>(
            r"
            SELECT id, title, rule_type, rule_value, min_amount, usage_limit,
                   usage_count, start_date, end_date, is_active
            FROM store.free_shipping_promotion
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Free-shipping promotions currently applicable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_free_shipping(
        &self,
    ) -> Result<Vec<FreeShippingPromotion>, RepositoryError> {
        let rows = sqlx::query_as::<_, FreeShippingRow>(
            r"
            SELECT id, title, rule_type, rule_value, min_amount, usage_limit,
                   usage_count, start_date, end_date, is_active
            FROM store.free_shipping_promotion
            WHERE is_active
              AND now() BETWEEN start_date AND end_date
              AND (usage_limit IS NULL OR usage_count < usage_limit)
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a free-shipping promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_free_shipping(
        &self,
        input: &FreeShippingInput,
    ) -> Result<FreeShippingPromotion, RepositoryError> {
        let row = sqlx::query_as::<_, FreeShippingRow>(
            r"
            INSERT INTO store.free_shipping_promotion
                (title, rule_type, rule_value, min_amount, usage_limit,
                 start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, rule_type, rule_value, min_amount, usage_limit,
                      usage_count, start_date, end_date, is_active
            ",
        )
        .bind(&input.title)
        .bind(input.rule_type.as_str())
        .bind(&input.rule_value)
        .bind(input.min_amount)
        .bind(input.usage_limit)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update a free-shipping promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn update_free_shipping(
        &self,
        id: PromotionId,
        input: &FreeShippingInput,
    ) -> Result<FreeShippingPromotion, RepositoryError> {
        let row = sqlx::query_as::<_, FreeShippingRow>(
            r"
            UPDATE store.free_shipping_promotion
            SET title = $1, rule_type = $2, rule_value = $3, min_amount = $4,
                usage_limit = $5, start_date = $6, end_date = $7, is_active = $8
            WHERE id = $9
            RETURNING id, title, rule_type, rule_value, min_amount, usage_limit,
                      usage_count, start_date, end_date, is_active
            ",
        )
        .bind(&input.title)
        .bind(input.rule_type.as_str())
        .bind(&input.rule_value)
        .bind(input.min_amount)
        .bind(input.usage_limit)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a free-shipping promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    pub async fn delete_free_shipping(&self, id: PromotionId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.free_shipping_promotion WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
