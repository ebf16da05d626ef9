//! Review repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use backoffice_core::{OrderId, ProductId, ReviewId};

use super::RepositoryError;
use crate::models::review::Review;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    customer_email: String,
    order_id: i32,
    product_id: i32,
    rating: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            customer_email: row.customer_email,
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, customer_email, order_id, product_id, rating, comment,
                   created_at, updated_at
            FROM store.review
            ORDER BY updated_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List reviews for one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, customer_email, order_id, product_id, rating, comment,
                   created_at, updated_at
            FROM store.review
            WHERE product_id = $1
            ORDER BY updated_at DESC
            ",
        )
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert or update a review.
    ///
    /// At most one review exists per `(customer_email, order_id, product_id)`;
    /// resubmission updates the rating and comment in place rather than
    /// creating a duplicate row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(
        &self,
        customer_email: &str,
        order_id: OrderId,
        product_id: ProductId,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            INSERT INTO store.review (customer_email, order_id, product_id, rating, comment)
            VALUES (lower($1), $2, $3, $4, $5)
            ON CONFLICT (customer_email, order_id, product_id)
            DO UPDATE SET rating = EXCLUDED.rating,
                          comment = EXCLUDED.comment,
                          updated_at = now()
            RETURNING id, customer_email, order_id, product_id, rating, comment,
                      created_at, updated_at
            ",
        )
        .bind(customer_email)
        .bind(order_id.as_i32())
        .bind(product_id.as_i32())
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.review WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
