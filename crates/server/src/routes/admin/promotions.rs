//! Admin promotion CRUD: vouchers, product vouchers, product discounts,
//! flash sales, and free-shipping promotions.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use backoffice_core::{
    DiscountType, FlashSaleId, Permission, ProductDiscountId, ProductId, ProductVoucherId,
    PromotionId, ShippingRule, VoucherId,
};

use crate::db::PromotionRepository;
use crate::db::promotions::{
    FlashSaleInput, FreeShippingInput, ProductDiscountInput, ProductVoucherInput, VoucherInput,
};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{FlashSale, FreeShippingPromotion, ProductDiscount, ProductVoucher, Voucher};
use crate::state::AppState;

use super::super::ApiResponse;

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::Validation(
            "end_date must not precede start_date".to_owned(),
        ));
    }
    Ok(())
}

fn parse_discount_type(raw: &str) -> Result<DiscountType, AppError> {
    raw.parse().map_err(AppError::Validation)
}

// =============================================================================
// Vouchers
// =============================================================================

/// Build the store-wide voucher router.
pub fn vouchers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vouchers).post(create_voucher))
        .route(
            "/{id}",
            get(get_voucher).put(update_voucher).delete(delete_voucher),
        )
}

#[derive(Debug, Deserialize)]
struct VoucherBody {
    code: String,
    discount_type: String,
    value: Decimal,
    min_purchase: Option<Decimal>,
    usage_limit: Option<i32>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl VoucherBody {
    fn validate(&self) -> Result<VoucherInput, AppError> {
        if self.code.trim().is_empty() {
            return Err(AppError::Validation("Voucher code is required".to_owned()));
        }
        validate_window(self.start_date, self.end_date)?;

        Ok(VoucherInput {
            code: self.code.trim().to_owned(),
            discount_type: parse_discount_type(&self.discount_type)?,
            value: self.value,
            min_purchase: self.min_purchase,
            usage_limit: self.usage_limit,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
        })
    }
}

async fn list_vouchers(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Voucher>>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let vouchers = PromotionRepository::new(state.pool()).list_vouchers().await?;
    Ok(ApiResponse::ok(vouchers))
}

async fn get_voucher(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Voucher>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let voucher = PromotionRepository::new(state.pool())
        .get_voucher(VoucherId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Voucher".to_owned()))?;
    Ok(ApiResponse::ok(voucher))
}

async fn create_voucher(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<VoucherBody>,
) -> Result<Json<ApiResponse<Voucher>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let voucher = PromotionRepository::new(state.pool())
        .create_voucher(&input)
        .await?;
    Ok(ApiResponse::ok(voucher))
}

async fn update_voucher(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<VoucherBody>,
) -> Result<Json<ApiResponse<Voucher>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let voucher = PromotionRepository::new(state.pool())
        .update_voucher(VoucherId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(voucher))
}

async fn delete_voucher(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    PromotionRepository::new(state.pool())
        .delete_voucher(VoucherId::new(id))
        .await?;
    Ok(ApiResponse::message("Voucher deleted"))
}

// =============================================================================
// Product vouchers
// =============================================================================

/// Build the product-voucher router.
pub fn product_vouchers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_product_vouchers).post(create_product_voucher))
        .route(
            "/{id}",
            put(update_product_voucher).delete(delete_product_voucher),
        )
}

#[derive(Debug, Deserialize)]
struct ProductVoucherBody {
    product_id: i32,
    code: String,
    discount_type: String,
    value: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    is_active: bool,
}

impl ProductVoucherBody {
    fn validate(&self) -> Result<ProductVoucherInput, AppError> {
        if self.code.trim().is_empty() {
            return Err(AppError::Validation("Voucher code is required".to_owned()));
        }
        validate_window(self.start_date, self.end_date)?;

        Ok(ProductVoucherInput {
            product_id: ProductId::new(self.product_id),
            code: self.code.trim().to_owned(),
            discount_type: parse_discount_type(&self.discount_type)?,
            value: self.value,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
        })
    }
}

async fn list_product_vouchers(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductVoucher>>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let vouchers = PromotionRepository::new(state.pool())
        .list_product_vouchers()
        .await?;
    Ok(ApiResponse::ok(vouchers))
}

async fn create_product_voucher(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProductVoucherBody>,
) -> Result<Json<ApiResponse<ProductVoucher>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let voucher = PromotionRepository::new(state.pool())
        .create_product_voucher(&input)
        .await?;
    Ok(ApiResponse::ok(voucher))
}

async fn update_product_voucher(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProductVoucherBody>,
) -> Result<Json<ApiResponse<ProductVoucher>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let voucher = PromotionRepository::new(state.pool())
        .update_product_voucher(ProductVoucherId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(voucher))
}

async fn delete_product_voucher(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    PromotionRepository::new(state.pool())
        .delete_product_voucher(ProductVoucherId::new(id))
        .await?;
    Ok(ApiResponse::message("Product voucher deleted"))
}

// =============================================================================
// Product discounts
// =============================================================================

/// Build the product-discount router.
pub fn product_discounts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_product_discounts).post(create_product_discount))
        .route(
            "/{id}",
            put(update_product_discount).delete(delete_product_discount),
        )
}

#[derive(Debug, Deserialize)]
struct ProductDiscountBody {
    product_id: i32,
    discount_percent: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    is_active: bool,
}

impl ProductDiscountBody {
    fn validate(&self) -> Result<ProductDiscountInput, AppError> {
        if self.discount_percent < Decimal::ZERO || self.discount_percent > Decimal::ONE_HUNDRED {
            return Err(AppError::Validation(
                "discount_percent must be between 0 and 100".to_owned(),
            ));
        }
        validate_window(self.start_date, self.end_date)?;

        Ok(ProductDiscountInput {
            product_id: ProductId::new(self.product_id),
            discount_percent: self.discount_percent,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
        })
    }
}

async fn list_product_discounts(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductDiscount>>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let discounts = PromotionRepository::new(state.pool())
        .list_product_discounts()
        .await?;
    Ok(ApiResponse::ok(discounts))
}

async fn create_product_discount(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProductDiscountBody>,
) -> Result<Json<ApiResponse<ProductDiscount>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let discount = PromotionRepository::new(state.pool())
        .create_product_discount(&input)
        .await?;
    Ok(ApiResponse::ok(discount))
}

async fn update_product_discount(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProductDiscountBody>,
) -> Result<Json<ApiResponse<ProductDiscount>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let discount = PromotionRepository::new(state.pool())
        .update_product_discount(ProductDiscountId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(discount))
}

async fn delete_product_discount(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    PromotionRepository::new(state.pool())
        .delete_product_discount(ProductDiscountId::new(id))
        .await?;
    Ok(ApiResponse::message("Product discount deleted"))
}

// =============================================================================
// Flash sales
// =============================================================================

/// Build the flash-sale router.
pub fn flash_sales_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_flash_sales).post(create_flash_sale))
        .route(
            "/{id}",
            put(update_flash_sale).delete(delete_flash_sale),
        )
}

#[derive(Debug, Deserialize)]
struct FlashSaleBody {
    title: String,
    discount_percent: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    is_active: bool,
}

impl FlashSaleBody {
    fn validate(&self) -> Result<FlashSaleInput, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_owned()));
        }
        if self.discount_percent < Decimal::ZERO || self.discount_percent > Decimal::ONE_HUNDRED {
            return Err(AppError::Validation(
                "discount_percent must be between 0 and 100".to_owned(),
            ));
        }
        validate_window(self.start_date, self.end_date)?;

        Ok(FlashSaleInput {
            title: self.title.trim().to_owned(),
            discount_percent: self.discount_percent,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
        })
    }
}

async fn list_flash_sales(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FlashSale>>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let sales = PromotionRepository::new(state.pool()).list_flash_sales().await?;
    Ok(ApiResponse::ok(sales))
}

async fn create_flash_sale(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<FlashSaleBody>,
) -> Result<Json<ApiResponse<FlashSale>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let sale = PromotionRepository::new(state.pool())
        .create_flash_sale(&input)
        .await?;
    Ok(ApiResponse::ok(sale))
}

async fn update_flash_sale(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<FlashSaleBody>,
) -> Result<Json<ApiResponse<FlashSale>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let sale = PromotionRepository::new(state.pool())
        .update_flash_sale(FlashSaleId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(sale))
}

async fn delete_flash_sale(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    PromotionRepository::new(state.pool())
        .delete_flash_sale(FlashSaleId::new(id))
        .await?;
    Ok(ApiResponse::message("Flash sale deleted"))
}

// =============================================================================
// Free-shipping promotions
// =============================================================================

/// Build the free-shipping router.
pub fn free_shipping_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_free_shipping).post(create_free_shipping))
        .route(
            "/{id}",
            put(update_free_shipping).delete(delete_free_shipping),
        )
}

#[derive(Debug, Deserialize)]
struct FreeShippingBody {
    title: String,
    rule_type: String,
    #[serde(default)]
    rule_value: String,
    min_amount: Option<Decimal>,
    usage_limit: Option<i32>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    is_active: bool,
}

impl FreeShippingBody {
    fn validate(&self) -> Result<FreeShippingInput, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_owned()));
        }
        let rule_type: ShippingRule = self.rule_type.parse().map_err(AppError::Validation)?;
        if rule_type == ShippingRule::MinAmount && self.min_amount.is_none() {
            return Err(AppError::Validation(
                "min_amount is required for min_amount rules".to_owned(),
            ));
        }
        validate_window(self.start_date, self.end_date)?;

        Ok(FreeShippingInput {
            title: self.title.trim().to_owned(),
            rule_type,
            rule_value: self.rule_value.trim().to_owned(),
            min_amount: self.min_amount,
            usage_limit: self.usage_limit,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
        })
    }
}

async fn list_free_shipping(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FreeShippingPromotion>>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let promos = PromotionRepository::new(state.pool()).list_free_shipping().await?;
    Ok(ApiResponse::ok(promos))
}

async fn create_free_shipping(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<FreeShippingBody>,
) -> Result<Json<ApiResponse<FreeShippingPromotion>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let promo = PromotionRepository::new(state.pool())
        .create_free_shipping(&input)
        .await?;
    Ok(ApiResponse::ok(promo))
}

async fn update_free_shipping(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<FreeShippingBody>,
) -> Result<Json<ApiResponse<FreeShippingPromotion>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    let input = body.validate()?;
    let promo = PromotionRepository::new(state.pool())
        .update_free_shipping(PromotionId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(promo))
}

async fn delete_free_shipping(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManagePromotions)?;
    PromotionRepository::new(state.pool())
        .delete_free_shipping(PromotionId::new(id))
        .await?;
    Ok(ApiResponse::message("Free-shipping promotion deleted"))
}
