//! Admin product CRUD.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use backoffice_core::{Permission, ProductId};

use crate::db::ProductRepository;
use crate::db::products::ProductInput;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::state::AppState;

use super::super::ApiResponse;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete_one))
}

#[derive(Debug, Deserialize)]
struct VariantBody {
    name: String,
    price: Option<Decimal>,
    #[serde(default)]
    stock: i32,
}

#[derive(Debug, Deserialize)]
struct ProductBody {
    name: String,
    #[serde(default)]
    category: String,
    regular_price: Decimal,
    promo_price: Option<Decimal>,
    #[serde(default)]
    stock: i32,
    #[serde(default = "default_status")]
    status: String,
    description: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    variants: Vec<VariantBody>,
}

fn default_status() -> String {
    "active".to_owned()
}

impl ProductBody {
    fn validate(&self) -> Result<ProductInput, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Product name is required".to_owned()));
        }
        if self.regular_price < Decimal::ZERO {
            return Err(AppError::Validation(
                "Regular price must not be negative".to_owned(),
            ));
        }

        Ok(ProductInput {
            name: self.name.trim().to_owned(),
            category: self.category.trim().to_owned(),
            regular_price: self.regular_price,
            promo_price: self.promo_price,
            stock: self.stock,
            status: self.status.clone(),
            description: self.description.clone(),
            images: self.images.clone(),
            variants: self
                .variants
                .iter()
                .map(|v| (v.name.clone(), v.price, v.stock))
                .collect(),
        })
    }
}

async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    user.require(Permission::ManageProducts)?;
    let products = ProductRepository::new(state.pool()).list(false).await?;
    Ok(ApiResponse::ok(products))
}

async fn get_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    user.require(Permission::ManageProducts)?;
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;
    Ok(ApiResponse::ok(product))
}

async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ProductBody>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    user.require(Permission::ManageProducts)?;
    let input = body.validate()?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok(ApiResponse::ok(product))
}

async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProductBody>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    user.require(Permission::ManageProducts)?;
    let input = body.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(product))
}

async fn delete_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManageProducts)?;
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    Ok(ApiResponse::message("Product deleted"))
}
