//! Admin resource controllers.
//!
//! Everything under `/api/admin` goes through the token auth gate
//! ([`crate::middleware::RequireAuth`]) and a per-resource capability check.
//! Unlike the public surface, these handlers are strict: query failures
//! surface as 5xx envelopes instead of empty lists.

pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;
pub mod promotions;
pub mod reviews;
pub mod users;
pub mod widgets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/admin` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/orders", orders::router())
        .nest("/vouchers", promotions::vouchers_router())
        .nest("/product-vouchers", promotions::product_vouchers_router())
        .nest("/product-discounts", promotions::product_discounts_router())
        .nest("/flash-sales", promotions::flash_sales_router())
        .nest("/free-shipping", promotions::free_shipping_router())
        .nest("/users", users::router())
        .nest("/reviews", reviews::router())
        .nest("/customers", customers::router())
        .nest("/widgets", widgets::router())
        .nest("/analytics", super::analytics::router())
}
