//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] backoffice_server::db::RepositoryError),

    #[error("{0}")]
    Invalid(String),
}

/// Connect using `BACKOFFICE_DATABASE_URL` (or the `DATABASE_URL` fallback).
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("BACKOFFICE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("BACKOFFICE_DATABASE_URL"))?;

    let pool = backoffice_server::db::create_pool(&SecretString::from(url)).await?;
    Ok(pool)
}
