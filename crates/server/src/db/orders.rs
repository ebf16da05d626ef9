//! Order repository.
//!
//! Order creation is the one place atomicity is enforced: the order row, its
//! item rows, and the stock adjustments commit together or not at all.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use backoffice_core::{OrderId, OrderItemId, OrderStatus, ProductId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_name: String,
    customer_email: String,
    shipping_address: String,
    tracking_number: Option<String>,
    status: String,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(self.id),
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            shipping_address: self.shipping_address,
            tracking_number: self.tracking_number,
            status: self.status,
            total_amount: self.total_amount,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    product_name: String,
    product_image: Option<String>,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            product_image: row.product_image,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// A line item for a new order. `product_name`/`product_image` are stored as
/// snapshots alongside the (nullable) product reference.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_image: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

/// Fields for placing a new order. `total_amount` is stored as given; it is
/// not validated against (or recomputed from) the item subtotals.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub total_amount: Decimal,
    pub items: Vec<NewOrderItem>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, with items attached. An optional status
    /// restricts the result to that (canonical) status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, RepositoryError> {
        let rows = if let Some(status) = status {
            sqlx::query_as::<_, OrderRow>(
                r"
                SELECT id, customer_name, customer_email, shipping_address,
                       tracking_number, status, total_amount, created_at, updated_at
                FROM store.order
                WHERE status = $1
                ORDER BY id DESC
                ",
            )
            .bind(status.as_str())
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, OrderRow>(
                r"
                SELECT id, customer_name, customer_email, shipping_address,
                       tracking_number, status, total_amount, created_at, updated_at
                FROM store.order
                ORDER BY id DESC
                ",
            )
            .fetch_all(self.pool)
            .await?
        };

        self.attach_items(rows).await
    }

    /// Get one order by ID with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_name, customer_email, shipping_address,
                   tracking_number, status, total_amount, created_at, updated_at
            FROM store.order
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Place an order: insert the order row, its items, and adjust product
    /// stock/sold counters, all within one transaction. Any failure rolls
    /// the whole placement back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO store.order
                (customer_name, customer_email, shipping_address, status, total_amount)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING id, customer_name, customer_email, shipping_address,
                      tracking_number, status, total_amount, created_at, updated_at
            ",
        )
        .bind(&new_order.customer_name)
        .bind(&new_order.customer_email)
        .bind(&new_order.shipping_address)
        .bind(new_order.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new_order.items {
            sqlx::query(
                r"
                INSERT INTO store.order_item
                    (order_id, product_id, product_name, product_image, quantity, price)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(row.id)
            .bind(item.product_id.map(|p| p.as_i32()))
            .bind(&item.product_name)
            .bind(&item.product_image)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;

            if let Some(product_id) = item.product_id {
                sqlx::query(
                    r"
                    UPDATE store.product
                    SET stock = stock - $1, sold_count = sold_count + $1
                    WHERE id = $2
                    ",
                )
                .bind(item.quantity)
                .bind(product_id.as_i32())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        let id = OrderId::new(row.id);
        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Update an order's status (normalized to canonical spelling) and
    /// optionally its tracking number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        tracking_number: Option<&str>,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE store.order
            SET status = $1,
                tracking_number = COALESCE($2, tracking_number),
                updated_at = now()
            WHERE id = $3
            RETURNING id, customer_name, customer_email, shipping_address,
                      tracking_number, status, total_amount, created_at, updated_at
            ",
        )
        .bind(status.as_str())
        .bind(tracking_number)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let order_id = OrderId::new(row.id);
        self.get_by_id(order_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an order and (by cascade) its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.order WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Attach item rows to a batch of orders.
    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, product_name, product_image, quantity, price
            FROM store.order_item
            WHERE order_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let orders = rows
            .into_iter()
            .map(|row| {
                let order_items = items
                    .iter()
                    .filter(|i| i.order_id == row.id)
                    .cloned()
                    .map(Into::into)
                    .collect();
                row.into_order(order_items)
            })
            .collect();

        Ok(orders)
    }
}
