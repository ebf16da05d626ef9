//! Database migration command.

use super::CliError;

/// Run the server's versioned migrations.
///
/// # Errors
///
/// Returns `CliError` if the connection or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
