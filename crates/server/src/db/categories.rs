//! Category repository.

use sqlx::PgPool;

use backoffice_core::CategoryId;

use super::{RepositoryError, map_unique_violation};
use crate::models::catalog::Category;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    is_active: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_active: row.is_active,
        }
    }
}

/// Fields for creating or updating a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories by name. `active_only` restricts to active ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Category>, RepositoryError> {
        let sql = if active_only {
            r"SELECT id, name, description, image_url, is_active
              FROM store.category WHERE is_active ORDER BY name"
        } else {
            r"SELECT id, name, description, image_url, is_active
              FROM store.category ORDER BY name"
        };

        let rows = sqlx::query_as::<_, CategoryRow>(sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"SELECT id, name, description, image_url, is_active
              FROM store.category WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO store.category (name, description, image_url, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, image_url, is_active
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "category name already exists"))?;

        Ok(row.into())
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE store.category
            SET name = $1, description = $2, image_url = $3, is_active = $4
            WHERE id = $5
            RETURNING id, name, description, image_url, is_active
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(input.is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "category name already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.category WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
