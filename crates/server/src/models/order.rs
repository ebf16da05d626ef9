//! Order and order-item domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_core::{OrderId, OrderItemId, OrderStatus, ProductId};

/// A customer order.
///
/// `status` is stored as text; writes normalize to the canonical spellings.
/// `total_amount` is stored as sent by the client and is never recomputed
/// from the item rows (and item rows are never recomputed from it).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub tracking_number: Option<String>,
    pub status: String,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The typed view of the stored status string, when recognized.
    #[must_use]
    pub fn normalized_status(&self) -> Option<OrderStatus> {
        OrderStatus::normalize(&self.status)
    }
}

/// A line item within an order.
///
/// `product_name`/`product_image` are snapshots taken at placement time, so
/// order history stays readable after the product changes or is deleted
/// (in which case `product_id` becomes `None`).
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_image: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}
