//! Catalog domain types: products, categories, and homepage widgets.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_core::{CategoryId, ProductId, ProductImageId, VariantId, WidgetId};

/// A catalog product with its images and variants.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Category name (denormalized, matches `Category::name`).
    pub category: String,
    pub regular_price: Decimal,
    pub promo_price: Option<Decimal>,
    pub stock: i32,
    pub status: String,
    /// Lifetime units sold; feeds the best-seller fallback heuristic.
    pub sold_count: i32,
    pub description: Option<String>,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product image, ordered by `sort_order`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub url: String,
    pub sort_order: i32,
}

/// A product variant (size, color, ...) with optional price override.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Option<Decimal>,
    pub stock: i32,
}

/// A product category.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// A storefront widget (banner, carousel, ...) with free-form JSON content.
#[derive(Debug, Clone, Serialize)]
pub struct Widget {
    pub id: WidgetId,
    pub title: String,
    pub widget_type: String,
    pub content: serde_json::Value,
    pub sort_order: i32,
    pub is_active: bool,
}
