//! Product review domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use backoffice_core::{OrderId, ProductId, ReviewId};

/// A product review.
///
/// Keyed uniquely by `(customer_email, order_id, product_id)`: a customer
/// leaves at most one review per product per order, and resubmission
/// updates the rating/comment in place.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub customer_email: String,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
