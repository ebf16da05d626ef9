//! Read-only aggregate queries feeding the analytics service.
//!
//! Everything here is a plain grouped SELECT; the post-aggregation math
//! (margins, shares, bucket fill) lives in [`crate::services::analytics`]
//! where it can be unit tested without a database.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

/// Per-product sales totals.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductSalesRow {
    pub product_id: Option<i32>,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

/// One product from the catalog-side fallback heuristics.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductFallbackRow {
    pub id: i32,
    pub name: String,
    pub sold_count: i32,
    pub regular_price: Decimal,
}

/// Per-day order count and revenue.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailySalesRow {
    pub day: NaiveDate,
    pub orders: i64,
    pub revenue: Decimal,
}

/// Per-month order count and revenue (month is 1-12).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlyRevenueRow {
    pub month: i32,
    pub orders: i64,
    pub revenue: Decimal,
}

/// Per-category totals.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategorySalesRow {
    pub category: String,
    pub orders: i64,
    pub revenue: Decimal,
}

/// Raw status string and how many orders carry it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusCountRow {
    pub status: String,
    pub count: i64,
}

/// Order count and revenue for a period.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeriodTotalsRow {
    pub orders: i64,
    pub revenue: Decimal,
}

/// Repository for analytics aggregate queries. Never mutates state.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Per-product quantity and revenue across completed orders, ranked by
    /// quantity then revenue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_sales_completed(
        &self,
        limit: i64,
    ) -> Result<Vec<ProductSalesRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r"
            SELECT oi.product_id,
                   MAX(oi.product_name) AS product_name,
                   SUM(oi.quantity)::bigint AS total_quantity,
                   COALESCE(SUM(oi.quantity * oi.price), 0) AS total_revenue
            FROM store.order_item oi
            JOIN store.order o ON o.id = oi.order_id
            WHERE o.status = 'completed'
            GROUP BY oi.product_id
            ORDER BY total_quantity DESC, total_revenue DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-product totals across completed orders within a lookback window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_sales_since(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ProductSalesRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r"
            SELECT oi.product_id,
                   MAX(oi.product_name) AS product_name,
                   SUM(oi.quantity)::bigint AS total_quantity,
                   COALESCE(SUM(oi.quantity * oi.price), 0) AS total_revenue
            FROM store.order_item oi
            JOIN store.order o ON o.id = oi.order_id
            WHERE o.status = 'completed' AND o.created_at >= $1
            GROUP BY oi.product_id
            ORDER BY total_quantity DESC, total_revenue DESC
            LIMIT $2
            ",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-product totals within one calendar month, completed orders only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_sales_for_month(
        &self,
        year: i32,
        month: i32,
        limit: i64,
    ) -> Result<Vec<ProductSalesRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r"
            SELECT oi.product_id,
                   MAX(oi.product_name) AS product_name,
                   SUM(oi.quantity)::bigint AS total_quantity,
                   COALESCE(SUM(oi.quantity * oi.price), 0) AS total_revenue
            FROM store.order_item oi
            JOIN store.order o ON o.id = oi.order_id
            WHERE o.status = 'completed'
              AND EXTRACT(YEAR FROM o.created_at) = $1
              AND EXTRACT(MONTH FROM o.created_at) = $2
            GROUP BY oi.product_id
            HAVING SUM(oi.quantity) > 0
            ORDER BY total_quantity DESC, total_revenue DESC
            LIMIT $3
            ",
        )
        .bind(year)
        .bind(month)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Products ranked by lifetime `sold_count` (first fallback tier).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_sold_count(
        &self,
        limit: i64,
    ) -> Result<Vec<ProductFallbackRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductFallbackRow>(
            r"
            SELECT id, name, sold_count, regular_price
            FROM store.product
            WHERE sold_count > 0
            ORDER BY sold_count DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// The latest products, regardless of sales (last fallback tier).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_products(
        &self,
        limit: i64,
    ) -> Result<Vec<ProductFallbackRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductFallbackRow>(
            r"
            SELECT id, name, sold_count, regular_price
            FROM store.product
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-day order count and revenue since an instant, completed orders
    /// only, grouped by calendar date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_sales_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailySalesRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySalesRow>(
            r"
            SELECT created_at::date AS day,
                   COUNT(*)::bigint AS orders,
                   COALESCE(SUM(total_amount), 0) AS revenue
            FROM store.order
            WHERE status = 'completed' AND created_at >= $1
            GROUP BY day
            ORDER BY day
            ",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Revenue per month for a year, across ALL orders regardless of status.
    ///
    /// The profit/loss report deliberately includes every order, unlike the
    /// completed-only endpoints.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_revenue(
        &self,
        year: i32,
    ) -> Result<Vec<MonthlyRevenueRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, MonthlyRevenueRow>(
            r"
            SELECT CAST(EXTRACT(MONTH FROM created_at) AS INT) AS month,
                   COUNT(*)::bigint AS orders,
                   COALESCE(SUM(total_amount), 0) AS revenue
            FROM store.order
            WHERE EXTRACT(YEAR FROM created_at) = $1
            GROUP BY month
            ORDER BY month
            ",
        )
        .bind(year)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Revenue and order count per product category, completed orders only.
    /// Items whose product was deleted carry no category and are excluded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_sales(&self) -> Result<Vec<CategorySalesRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategorySalesRow>(
            r"
            SELECT p.category,
                   COUNT(DISTINCT o.id)::bigint AS orders,
                   COALESCE(SUM(oi.quantity * oi.price), 0) AS revenue
            FROM store.order_item oi
            JOIN store.order o ON o.id = oi.order_id
            JOIN store.product p ON p.id = oi.product_id
            WHERE o.status = 'completed'
            GROUP BY p.category
            ORDER BY revenue DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Raw status counts across all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_counts(&self) -> Result<Vec<StatusCountRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            r"
            SELECT status, COUNT(*)::bigint AS count
            FROM store.order
            GROUP BY status
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Order count and revenue for completed orders since an instant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn totals_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<PeriodTotalsRow, RepositoryError> {
        let row = sqlx::query_as::<_, PeriodTotalsRow>(
            r"
            SELECT COUNT(*)::bigint AS orders,
                   COALESCE(SUM(total_amount), 0) AS revenue
            FROM store.order
            WHERE status = 'completed' AND created_at >= $1
            ",
        )
        .bind(since)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }
}
