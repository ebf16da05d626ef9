//! Database access for the back-office `PostgreSQL` database.
//!
//! # Tables (schema `store`)
//!
//! - `user`, `role`, `api_token`, `verification_code` - authentication
//! - `product`, `product_image`, `product_variant`, `category`, `widget` - catalog
//! - `order`, `order_item` - order lifecycle
//! - `voucher`, `product_voucher`, `product_discount`, `flash_sale`,
//!   `free_shipping_promotion` - promotions
//! - `review`, `customer` - storefront data
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p backoffice-cli -- migrate
//! ```
//! They are never run per-request or at server startup.
//!
//! # Query style
//!
//! Queries are runtime-bound (`sqlx::query_as::<_, Row>` + `.bind`), with row
//! structs deriving `sqlx::FromRow` and converting into the domain types in
//! [`crate::models`].

pub mod analytics;
pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;
pub mod promotions;
pub mod reviews;
pub mod users;
pub mod widgets;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use categories::CategoryRepository;
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use promotions::PromotionRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;
pub use widgets::WidgetRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation onto `RepositoryError::Conflict`.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
