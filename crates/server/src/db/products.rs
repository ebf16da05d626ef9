//! Product repository: products with their images and variants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use backoffice_core::{ProductId, ProductImageId, VariantId};

use super::RepositoryError;
use crate::models::catalog::{Product, ProductImage, ProductVariant};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    category: String,
    regular_price: Decimal,
    promo_price: Option<Decimal>,
    stock: i32,
    status: String,
    sold_count: i32,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, images: Vec<ProductImage>, variants: Vec<ProductVariant>) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name,
            category: self.category,
            regular_price: self.regular_price,
            promo_price: self.promo_price,
            stock: self.stock,
            status: self.status,
            sold_count: self.sold_count,
            description: self.description,
            images,
            variants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductImageRow {
    id: i32,
    product_id: i32,
    url: String,
    sort_order: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductVariantRow {
    id: i32,
    product_id: i32,
    name: String,
    price: Option<Decimal>,
    stock: i32,
}

/// Fields for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub regular_price: Decimal,
    pub promo_price: Option<Decimal>,
    pub stock: i32,
    pub status: String,
    pub description: Option<String>,
    /// Image URLs in display order.
    pub images: Vec<String>,
    /// Variants as (name, price override, stock).
    pub variants: Vec<(String, Option<Decimal>, i32)>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first, with images and variants attached.
    ///
    /// `active_only` restricts to products with status `active` (the public
    /// surface); the admin list sees everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Product>, RepositoryError> {
        let rows = if active_only {
            sqlx::query_as::<_, ProductRow>(
                r"
                SELECT id, name, category, regular_price, promo_price, stock,
                       status, sold_count, description, created_at, updated_at
                FROM store.product
                WHERE status = 'active'
                ORDER BY id DESC
                ",
            )
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, ProductRow>(
                r"
                SELECT id, name, category, regular_price, promo_price, stock,
                       status, sold_count, description, created_at, updated_at
                FROM store.product
                ORDER BY id DESC
                ",
            )
            .fetch_all(self.pool)
            .await?
        };

        self.attach_children(rows).await
    }

    /// The top products by lifetime units sold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn top_by_sold(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, category, regular_price, promo_price, stock,
                   status, sold_count, description, created_at, updated_at
            FROM store.product
            WHERE status = 'active'
            ORDER BY sold_count DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.attach_children(rows).await
    }

    /// Get one product by ID with images and variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, category, regular_price, promo_price, stock,
                   status, sold_count, description, created_at, updated_at
            FROM store.product
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_children(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Create a product with its images and variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO store.product
                (name, category, regular_price, promo_price, stock, status, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, category, regular_price, promo_price, stock,
                      status, sold_count, description, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.regular_price)
        .bind(input.promo_price)
        .bind(input.stock)
        .bind(&input.status)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        for (sort_order, url) in input.images.iter().enumerate() {
            sqlx::query(
                r"INSERT INTO store.product_image (product_id, url, sort_order) VALUES ($1, $2, $3)",
            )
            .bind(row.id)
            .bind(url)
            .bind(i32::try_from(sort_order).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        for (name, price, stock) in &input.variants {
            sqlx::query(
                r"INSERT INTO store.product_variant (product_id, name, price, stock) VALUES ($1, $2, $3, $4)",
            )
            .bind(row.id)
            .bind(name)
            .bind(price)
            .bind(stock)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let id = ProductId::new(row.id);
        self.get_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update a product, replacing its images and variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE store.product
            SET name = $1, category = $2, regular_price = $3, promo_price = $4,
                stock = $5, status = $6, description = $7, updated_at = now()
            WHERE id = $8
            ",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.regular_price)
        .bind(input.promo_price)
        .bind(input.stock)
        .bind(&input.status)
        .bind(&input.description)
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(r"DELETE FROM store.product_image WHERE product_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
        sqlx::query(r"DELETE FROM store.product_variant WHERE product_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        for (sort_order, url) in input.images.iter().enumerate() {
            sqlx::query(
                r"INSERT INTO store.product_image (product_id, url, sort_order) VALUES ($1, $2, $3)",
            )
            .bind(id.as_i32())
            .bind(url)
            .bind(i32::try_from(sort_order).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        for (name, price, stock) in &input.variants {
            sqlx::query(
                r"INSERT INTO store.product_variant (product_id, name, price, stock) VALUES ($1, $2, $3, $4)",
            )
            .bind(id.as_i32())
            .bind(name)
            .bind(price)
            .bind(stock)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Order items referencing it keep their snapshot
    /// columns and get `product_id = NULL`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Attach images and variants to a batch of product rows.
    async fn attach_children(
        &self,
        rows: Vec<ProductRow>,
    ) -> Result<Vec<Product>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let images = sqlx::query_as::<_, ProductImageRow>(
            r"
            SELECT id, product_id, url, sort_order
            FROM store.product_image
            WHERE product_id = ANY($1)
            ORDER BY sort_order, id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let variants = sqlx::query_as::<_, ProductVariantRow>(
            r"
            SELECT id, product_id, name, price, stock
            FROM store.product_variant
            WHERE product_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let products = rows
            .into_iter()
            .map(|row| {
                let product_images = images
                    .iter()
                    .filter(|i| i.product_id == row.id)
                    .map(|i| ProductImage {
                        id: ProductImageId::new(i.id),
                        product_id: ProductId::new(i.product_id),
                        url: i.url.clone(),
                        sort_order: i.sort_order,
                    })
                    .collect();
                let product_variants = variants
                    .iter()
                    .filter(|v| v.product_id == row.id)
                    .map(|v| ProductVariant {
                        id: VariantId::new(v.id),
                        product_id: ProductId::new(v.product_id),
                        name: v.name.clone(),
                        price: v.price,
                        stock: v.stock,
                    })
                    .collect();
                row.into_product(product_images, product_variants)
            })
            .collect();

        Ok(products)
    }
}
