//! Widget repository.

use sqlx::PgPool;

use backoffice_core::WidgetId;

use super::RepositoryError;
use crate::models::catalog::Widget;

#[derive(Debug, sqlx::FromRow)]
struct WidgetRow {
    id: i32,
    title: String,
    widget_type: String,
    content: serde_json::Value,
    sort_order: i32,
    is_active: bool,
}

impl From<WidgetRow> for Widget {
    fn from(row: WidgetRow) -> Self {
        Self {
            id: WidgetId::new(row.id),
            title: row.title,
            widget_type: row.widget_type,
            content: row.content,
            sort_order: row.sort_order,
            is_active: row.is_active,
        }
    }
}

/// Fields for creating or updating a widget.
#[derive(Debug, Clone)]
pub struct WidgetInput {
    pub title: String,
    pub widget_type: String,
    pub content: serde_json::Value,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Repository for widget database operations.
pub struct WidgetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WidgetRepository<'a> {
    /// Create a new widget repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List widgets in display order. `active_only` restricts to active ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Widget>, RepositoryError> {
        let sql = if active_only {
            r"SELECT id, title, widget_type, content, sort_order, is_active
              FROM store.widget WHERE is_active ORDER BY sort_order, id"
        } else {
            r"SELECT id, title, widget_type, content, sort_order, is_active
              FROM store.widget ORDER BY sort_order, id"
        };

        let rows = sqlx::query_as::<_, WidgetRow>(sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a widget by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: WidgetId) -> Result<Option<Widget>, RepositoryError> {
        let row = sqlx::query_as::<_, WidgetRow>(
            r"SELECT id, title, widget_type, content, sort_order, is_active
              FROM store.widget WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a widget.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &WidgetInput) -> Result<Widget, RepositoryError> {
        let row = sqlx::query_as::<_, WidgetRow>(
            r"
            INSERT INTO store.widget (title, widget_type, content, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, widget_type, content, sort_order, is_active
            ",
        )
        .bind(&input.title)
        .bind(&input.widget_type)
        .bind(&input.content)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a widget.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the widget doesn't exist.
    pub async fn update(
        &self,
        id: WidgetId,
        input: &WidgetInput,
    ) -> Result<Widget, RepositoryError> {
        let row = sqlx::query_as::<_, WidgetRow>(
            r"
            UPDATE store.widget
            SET title = $1, widget_type = $2, content = $3, sort_order = $4, is_active = $5
            WHERE id = $6
            RETURNING id, title, widget_type, content, sort_order, is_active
            ",
        )
        .bind(&input.title)
        .bind(&input.widget_type)
        .bind(&input.content)
        .bind(input.sort_order)
        .bind(input.is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a widget.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the widget doesn't exist.
    pub async fn delete(&self, id: WidgetId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.widget WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
