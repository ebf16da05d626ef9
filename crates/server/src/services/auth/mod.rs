//! Login and session issuance.
//!
//! Identifiers are email or display name, matched case-insensitively.
//! Passwords are Argon2id hashes; an unknown identifier still runs a dummy
//! verification so response timing is uniform for both failure causes.
//!
//! Two deliberate behaviors from the product contract:
//! - An unapproved account (`is_active = false`) still receives a session
//!   token; the response flags the state and the client routes to its
//!   pending-approval screen.
//! - A login resolving to the super-admin role never receives a token
//!   directly. It gets a 6-digit code, emailed to the operator address,
//!   which must be verified within 10 minutes to unlock the session.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use backoffice_core::{Email, RoleId, UserId};

use crate::db::RepositoryError;
use crate::db::users::{UserIdentity, UserRepository};
use crate::models::user::{ApiToken, User};
use crate::services::email::generate_verification_code;

/// Minimum password length for registration.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Session TTL with "remember me" checked.
const TOKEN_TTL_REMEMBER: Duration = Duration::days(7);

/// Session TTL without "remember me".
const TOKEN_TTL_DEFAULT: Duration = Duration::hours(24);

/// How long a super-admin verification code stays valid.
const VERIFICATION_CODE_TTL: Duration = Duration::minutes(10);

/// Hash verified against when the identifier is unknown, so both failure
/// causes take the same time.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("not-a-real-password").unwrap_or_else(|_| String::new())
});

/// Outcome of a successful credential check.
#[derive(Debug)]
pub enum LoginOutcome {
    /// A session token was issued. Inactive accounts land here too, with
    /// `identity.is_active == false`.
    Session {
        identity: UserIdentity,
        token: ApiToken,
    },
    /// A super-admin login: no token yet. The code must be emailed to the
    /// operator and verified before a session is issued.
    VerificationRequired {
        identity: UserIdentity,
        code: String,
    },
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new pending user (`is_active = false`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `AuthError::WeakPassword` on
    /// validation failure and `AuthError::EmailTaken` on duplicate email.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, None)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Check credentials and either issue a session token or start the
    /// super-admin verification flow.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown identifier or
    /// a password mismatch (indistinguishable by design).
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginOutcome, AuthError> {
        let Some((user, password_hash)) = self.users.find_by_identifier(identifier).await? else {
            // Burn the same time as a real verification
            let _ = verify_password(password, &DUMMY_HASH);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        let identity = self
            .users
            .load_identity(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Pending accounts still get a token; the client decides where to
        // route based on is_active.
        if identity.is_active && identity.role_id == Some(RoleId::SUPER_ADMIN) {
            let code = generate_verification_code();
            self.users
                .store_verification_code(identity.id, &code, Utc::now() + VERIFICATION_CODE_TTL)
                .await?;
            return Ok(LoginOutcome::VerificationRequired { identity, code });
        }

        let token = self.issue_token(identity.id, remember_me).await?;
        Ok(LoginOutcome::Session { identity, token })
    }

    /// Verify a super-admin code and issue the real session token.
    ///
    /// The code is single-use: it is deleted on success and on expiry. The
    /// account is re-validated to still be an active super-admin before a
    /// token is issued.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCode`, `AuthError::ExpiredCode`, or
    /// `AuthError::AccountNotEligible`.
    pub async fn verify_superadmin(
        &self,
        user_id: UserId,
        code: &str,
        remember_me: bool,
    ) -> Result<(UserIdentity, ApiToken), AuthError> {
        let stored = self
            .users
            .get_verification_code(user_id)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        if !constant_time_eq(code, &stored.code) {
            return Err(AuthError::InvalidCode);
        }

        if stored.expires_at < Utc::now() {
            self.users.delete_verification_code(user_id).await?;
            return Err(AuthError::ExpiredCode);
        }

        let identity = self
            .users
            .load_identity(user_id)
            .await?
            .ok_or(AuthError::AccountNotEligible)?;

        if !identity.is_active || identity.role_id != Some(RoleId::SUPER_ADMIN) {
            return Err(AuthError::AccountNotEligible);
        }

        self.users.delete_verification_code(user_id).await?;

        let token = self.issue_token(user_id, remember_me).await?;
        Ok((identity, token))
    }

    /// Rotate the pending verification code for a super-admin login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotEligible` if the account is not an
    /// active super-admin.
    pub async fn resend_superadmin_code(
        &self,
        user_id: UserId,
    ) -> Result<(UserIdentity, String), AuthError> {
        let identity = self
            .users
            .load_identity(user_id)
            .await?
            .ok_or(AuthError::AccountNotEligible)?;

        if !identity.is_active || identity.role_id != Some(RoleId::SUPER_ADMIN) {
            return Err(AuthError::AccountNotEligible);
        }

        let code = generate_verification_code();
        self.users
            .store_verification_code(user_id, &code, Utc::now() + VERIFICATION_CODE_TTL)
            .await?;

        Ok((identity, code))
    }

    /// Close a session by deleting its token row.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the delete fails.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.users.delete_token(token).await?;
        Ok(())
    }

    /// Record a fresh opaque session token for the user.
    async fn issue_token(
        &self,
        user_id: UserId,
        remember_me: bool,
    ) -> Result<ApiToken, AuthError> {
        let ttl = if remember_me {
            TOKEN_TTL_REMEMBER
        } else {
            TOKEN_TTL_DEFAULT
        };

        let token = generate_session_token();
        let created = self
            .users
            .create_token(user_id, &token, Utc::now() + ttl)
            .await?;

        Ok(created)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate password requirements for registration.
const fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate an opaque session token: 32 random bytes, URL-safe base64.
fn generate_session_token() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two code strings without short-circuiting on the first
/// mismatching byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_session_token_shape() {
        let token = generate_session_token();
        // 32 bytes -> 43 chars of unpadded base64
        assert_eq!(token.len(), 43);
        assert_ne!(token, generate_session_token());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("483920", "483920"));
        assert!(!constant_time_eq("483920", "483921"));
        assert!(!constant_time_eq("483920", "48392"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_ttl_constants() {
        assert_eq!(TOKEN_TTL_REMEMBER, Duration::days(7));
        assert_eq!(TOKEN_TTL_DEFAULT, Duration::hours(24));
        assert_eq!(VERIFICATION_CODE_TTL, Duration::minutes(10));
    }
}
