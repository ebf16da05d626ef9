//! Public (unauthenticated) storefront surface.
//!
//! List endpoints here are deliberately lenient: a failed query logs a
//! warning and returns `{success: true, data: []}` so the storefront keeps
//! rendering. Order placement and review submission stay strict.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use backoffice_core::{OrderId, ProductId};

use crate::db::{
    CategoryRepository, CustomerRepository, OrderRepository, ProductRepository,
    PromotionRepository, RepositoryError, ReviewRepository, WidgetRepository,
};
use crate::db::orders::{NewOrder, NewOrderItem};
use crate::error::AppError;
use crate::models::{
    Category, Customer, FlashSale, FreeShippingPromotion, Order, Product, Review, Voucher, Widget,
};
use crate::state::AppState;

use super::ApiResponse;

/// Build the public router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products))
        .route("/top-products", get(top_products))
        .route("/widgets", get(widgets))
        .route("/vouchers", get(vouchers))
        .route("/flash-sales", get(flash_sales))
        .route("/free-shipping", get(free_shipping))
        .route("/categories", get(categories))
        .route("/orders", post(place_order))
        .route("/reviews", get(product_reviews).post(submit_review))
        .route("/customer-status", get(customer_status))
}

/// Swallow a listing failure into an empty result, keeping the storefront
/// rendering; the failure still lands in the logs.
fn or_empty<T>(result: Result<Vec<T>, RepositoryError>, what: &str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, resource = what, "public listing failed, returning empty");
            Vec::new()
        }
    }
}

async fn products(State(state): State<AppState>) -> Json<ApiResponse<Vec<Product>>> {
    let result = ProductRepository::new(state.pool()).list(true).await;
    ApiResponse::ok(or_empty(result, "products"))
}

async fn top_products(State(state): State<AppState>) -> Json<ApiResponse<Vec<Product>>> {
    let result = ProductRepository::new(state.pool()).top_by_sold(10).await;
    ApiResponse::ok(or_empty(result, "top-products"))
}

async fn widgets(State(state): State<AppState>) -> Json<ApiResponse<Vec<Widget>>> {
    let result = WidgetRepository::new(state.pool()).list(true).await;
    ApiResponse::ok(or_empty(result, "widgets"))
}

async fn vouchers(State(state): State<AppState>) -> Json<ApiResponse<Vec<Voucher>>> {
    let result = PromotionRepository::new(state.pool()).active_vouchers().await;
    ApiResponse::ok(or_empty(result, "vouchers"))
}

async fn flash_sales(State(state): State<AppState>) -> Json<ApiResponse<Vec<FlashSale>>> {
    let result = PromotionRepository::new(state.pool()).active_flash_sales().await;
    ApiResponse::ok(or_empty(result, "flash-sales"))
}

async fn free_shipping(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<FreeShippingPromotion>>> {
    let result = PromotionRepository::new(state.pool()).active_free_shipping().await;
    ApiResponse::ok(or_empty(result, "free-shipping"))
}

async fn categories(State(state): State<AppState>) -> Json<ApiResponse<Vec<Category>>> {
    let result = CategoryRepository::new(state.pool()).list(true).await;
    ApiResponse::ok(or_empty(result, "categories"))
}

// =============================================================================
// Order placement
// =============================================================================

#[derive(Debug, Deserialize)]
struct OrderItemBody {
    product_id: Option<i32>,
    product_name: String,
    product_image: Option<String>,
    quantity: i32,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct PlaceOrderBody {
    customer_name: String,
    customer_email: String,
    #[serde(default)]
    shipping_address: String,
    /// Stored as sent; not recomputed from the items.
    total_amount: Decimal,
    items: Vec<OrderItemBody>,
    voucher_code: Option<String>,
}

/// Place an order. The order row and its items are inserted in one
/// transaction; a voucher code, when present, is redeemed atomically first.
async fn place_order(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    if body.customer_name.trim().is_empty() {
        return Err(AppError::Validation("Customer name is required".to_owned()));
    }
    if body.customer_email.trim().is_empty() {
        return Err(AppError::Validation("Customer email is required".to_owned()));
    }
    if body.items.is_empty() {
        return Err(AppError::Validation(
            "An order needs at least one item".to_owned(),
        ));
    }
    if body.items.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::Validation(
            "Item quantities must be positive".to_owned(),
        ));
    }

    if let Some(code) = body.voucher_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        let redeemed = PromotionRepository::new(state.pool())
            .redeem_voucher(code)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => {
                    AppError::Validation("Invalid voucher code".to_owned())
                }
                other => AppError::from(other),
            })?;
        if redeemed.is_none() {
            return Err(AppError::Validation(
                "Voucher is not currently redeemable".to_owned(),
            ));
        }
    }

    let new_order = NewOrder {
        customer_name: body.customer_name.trim().to_owned(),
        customer_email: body.customer_email.trim().to_owned(),
        shipping_address: body.shipping_address.trim().to_owned(),
        total_amount: body.total_amount,
        items: body
            .items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id.map(ProductId::new),
                product_name: item.product_name.clone(),
                product_image: item.product_image.clone(),
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
    };

    let order = OrderRepository::new(state.pool()).create(&new_order).await?;
    Ok(ApiResponse::ok(order))
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Debug, Deserialize)]
struct ReviewBody {
    customer_email: String,
    order_id: i32,
    product_id: i32,
    rating: i32,
    comment: Option<String>,
}

/// Submit a review. Resubmitting for the same `(email, order, product)`
/// updates the existing row instead of creating a duplicate.
async fn submit_review(
    State(state): State<AppState>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<ApiResponse<Review>>, AppError> {
    if body.customer_email.trim().is_empty() {
        return Err(AppError::Validation("Customer email is required".to_owned()));
    }
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_owned(),
        ));
    }

    let review = ReviewRepository::new(state.pool())
        .upsert(
            body.customer_email.trim(),
            OrderId::new(body.order_id),
            ProductId::new(body.product_id),
            body.rating,
            body.comment.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(review))
}

#[derive(Debug, Deserialize)]
struct ProductReviewsQuery {
    product_id: i32,
}

async fn product_reviews(
    State(state): State<AppState>,
    Query(query): Query<ProductReviewsQuery>,
) -> Json<ApiResponse<Vec<Review>>> {
    let result = ReviewRepository::new(state.pool())
        .list_for_product(ProductId::new(query.product_id))
        .await;
    ApiResponse::ok(or_empty(result, "reviews"))
}

// =============================================================================
// Customer status
// =============================================================================

#[derive(Debug, Deserialize)]
struct CustomerStatusQuery {
    email: String,
}

/// Check a customer's account status by email (pending/active/blocked).
async fn customer_status(
    State(state): State<AppState>,
    Query(query): Query<CustomerStatusQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let customer: Customer = CustomerRepository::new(state.pool())
        .get_by_email(query.email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_owned()))?;

    Ok(ApiResponse::ok(serde_json::json!({
        "email": customer.email,
        "status": customer.status,
    })))
}
