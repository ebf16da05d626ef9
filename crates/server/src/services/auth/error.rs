//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors from login, registration, and the verification flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier or password mismatch. One variant for both, so the
    /// response body cannot be used for account enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The verification code does not match.
    #[error("Invalid verification code")]
    InvalidCode,

    /// The verification code has expired.
    #[error("Verification code expired")]
    ExpiredCode,

    /// The account is no longer an active super-admin account.
    #[error("Account is not eligible for verification")]
    AccountNotEligible,

    /// Registration email is already in use.
    #[error("email already registered")]
    EmailTaken,

    /// Registration email failed validation.
    #[error("invalid email")]
    InvalidEmail(#[from] backoffice_core::EmailError),

    /// Registration password failed validation.
    #[error("password does not meet requirements")]
    WeakPassword,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Verification email could not be sent.
    #[error("email delivery failed: {0}")]
    Email(#[from] crate::services::email::EmailError),
}
