//! Demo data seeding.
//!
//! Inserts a small catalog for local development. Idempotent: rows are
//! keyed on their natural unique columns and skipped when present.

use super::CliError;

const CATEGORIES: &[(&str, &str)] = &[
    ("apparel", "Clothing and accessories"),
    ("electronics", "Gadgets and devices"),
    ("home", "Household goods"),
];

const PRODUCTS: &[(&str, &str, i64, i32)] = &[
    // (name, category, regular_price, stock)
    ("Classic Tee", "apparel", 150_000, 120),
    ("Canvas Tote", "apparel", 95_000, 80),
    ("Wireless Earbuds", "electronics", 650_000, 45),
    ("Desk Lamp", "home", 210_000, 60),
    ("Ceramic Mug", "home", 55_000, 200),
];

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns `CliError` if an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    for (name, description) in CATEGORIES {
        sqlx::query(
            r"
            INSERT INTO store.category (name, description)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(name)
        .bind(description)
        .execute(&pool)
        .await?;
    }

    for (name, category, price, stock) in PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO store.product (name, category, regular_price, stock)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (SELECT 1 FROM store.product WHERE name = $1)
            ",
        )
        .bind(name)
        .bind(category)
        .bind(*price)
        .bind(stock)
        .execute(&pool)
        .await?;
    }

    tracing::info!(
        categories = CATEGORIES.len(),
        products = PRODUCTS.len(),
        "Seed complete"
    );
    Ok(())
}
