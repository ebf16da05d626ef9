//! Operator user management commands.

use backoffice_core::{Email, RoleId};
use backoffice_server::db::UserRepository;
use backoffice_server::services::auth::hash_password;

use super::CliError;

/// Create a user, optionally activating it immediately.
///
/// # Errors
///
/// Returns `CliError` on validation or database failure.
pub async fn create(
    email: &str,
    name: &str,
    password: &str,
    role: Option<i32>,
    active: bool,
) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::Invalid(e.to_string()))?;
    if password.len() < 8 {
        return Err(CliError::Invalid(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash = hash_password(password)
        .map_err(|_| CliError::Invalid("password hashing failed".to_owned()))?;

    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .create(name, &email, &password_hash, role.map(RoleId::new))
        .await?;

    let user = if active {
        users.set_active(user.id, true).await?
    } else {
        user
    };

    tracing::info!(
        id = %user.id,
        email = %user.email,
        is_active = user.is_active,
        "User created"
    );
    Ok(())
}

/// Approve a pending account by email.
///
/// # Errors
///
/// Returns `CliError` if the user is unknown or the update fails.
pub async fn activate(email: &str) -> Result<(), CliError> {
    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .find_by_identifier(email)
        .await?
        .ok_or_else(|| CliError::Invalid(format!("no user with email {email}")))?
        .0;

    let user = users.set_active(user.id, true).await?;
    tracing::info!(id = %user.id, email = %user.email, "User activated");
    Ok(())
}

/// Change a user's role by email.
///
/// # Errors
///
/// Returns `CliError` if the user is unknown or the update fails.
pub async fn set_role(email: &str, role: i32) -> Result<(), CliError> {
    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .find_by_identifier(email)
        .await?
        .ok_or_else(|| CliError::Invalid(format!("no user with email {email}")))?
        .0;

    let updated = users
        .update(user.id, &user.name, Some(RoleId::new(role)), user.is_active)
        .await?;

    tracing::info!(
        id = %updated.id,
        email = %updated.email,
        role = ?updated.role_id,
        "Role updated"
    );
    Ok(())
}
