//! User, role, session-token, and verification-code repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use backoffice_core::{Email, PermissionSet, RoleId, TokenId, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::{ApiToken, Role, User};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    role_id: Option<i32>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            role_id: row.role_id.map(RoleId::new),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i32,
    name: String,
    display_name: String,
    permissions: serde_json::Value,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::new(row.id),
            name: row.name,
            display_name: row.display_name,
            // Lenient by contract: malformed permission data never fails a
            // request, it yields an empty capability set.
            permissions: PermissionSet::from_json(&row.permissions),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    id: i32,
    user_id: i32,
    token: String,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<TokenRow> for ApiToken {
    fn from(row: TokenRow) -> Self {
        Self {
            id: TokenId::new(row.id),
            user_id: UserId::new(row.user_id),
            token: row.token,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

/// A user joined with its role for identity resolution.
#[derive(Debug, sqlx::FromRow)]
struct UserIdentityRow {
    id: i32,
    name: String,
    email: String,
    role_id: Option<i32>,
    is_active: bool,
    role_name: Option<String>,
    permissions: Option<serde_json::Value>,
}

/// Resolved identity data for the auth gate and login responses.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role_id: Option<RoleId>,
    pub role_name: Option<String>,
    pub is_active: bool,
    pub permissions: PermissionSet,
}

impl TryFrom<UserIdentityRow> for UserIdentity {
    type Error = RepositoryError;

    fn try_from(row: UserIdentityRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            role_id: row.role_id.map(RoleId::new),
            role_name: row.role_name,
            is_active: row.is_active,
            permissions: row
                .permissions
                .map(|p| PermissionSet::from_json(&p))
                .unwrap_or_default(),
        })
    }
}

/// A stored verification code for the super-admin login flow.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VerificationCode {
    pub user_id: i32,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for users, roles, session tokens, and verification codes.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, role_id, is_active, created_at, updated_at
            FROM store.user
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, role_id, is_active, created_at, updated_at
            FROM store.user
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Find a user by login identifier: email or name, case-insensitively.
    ///
    /// Returns the password hash alongside the user for verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithHashRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT id, name, email, role_id, is_active, created_at, updated_at,
                   password_hash
            FROM store.user
            WHERE lower(email) = lower($1) OR lower(name) = lower($1)
            LIMIT 1
            ",
        )
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((r.user.try_into()?, r.password_hash)))
            .transpose()
    }

    /// Create a pending user (`is_active = false`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role_id: Option<RoleId>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO store.user (name, email, password_hash, role_id, is_active)
            VALUES ($1, lower($2), $3, $4, FALSE)
            RETURNING id, name, email, role_id, is_active, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role_id.map(|r| r.as_i32()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email already exists"))?;

        row.try_into()
    }

    /// Update a user's name, role, and active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update(
        &self,
        id: UserId,
        name: &str,
        role_id: Option<RoleId>,
        is_active: bool,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE store.user
            SET name = $1, role_id = $2, is_active = $3, updated_at = now()
            WHERE id = $4
            RETURNING id, name, email, role_id, is_active, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(role_id.map(|r| r.as_i32()))
        .bind(is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Set only the active flag (admin approval / deactivation).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_active(&self, id: UserId, is_active: bool) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE store.user
            SET is_active = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, name, email, role_id, is_active, created_at, updated_at
            ",
        )
        .bind(is_active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a user. Cascades to their tokens and verification code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM store.user WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List all roles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_roles(&self) -> Result<Vec<Role>, RepositoryError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r"SELECT id, name, display_name, permissions FROM store.role ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Identity resolution (token auth gate)
    // =========================================================================

    /// Load a user LEFT JOINed with its role. A missing or dangling role
    /// yields `role_name = None` and an empty permission set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load_identity(
        &self,
        id: UserId,
    ) -> Result<Option<UserIdentity>, RepositoryError> {
        let row = sqlx::query_as::<_, UserIdentityRow>(
            r"
            SELECT u.id, u.name, u.email, u.role_id, u.is_active,
                   r.name AS role_name, r.permissions
            FROM store.user u
            LEFT JOIN store.role r ON r.id = u.role_id
            WHERE u.id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    // =========================================================================
    // Session tokens
    // =========================================================================

    /// Record a new session token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_token(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<ApiToken, RepositoryError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r"
            INSERT INTO store.api_token (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token, expires_at, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(token)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Look up a session token by its opaque string.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_token(&self, token: &str) -> Result<Option<ApiToken>, RepositoryError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r"
            SELECT id, user_id, token, expires_at, created_at
            FROM store.api_token
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a token row by its opaque string (logout, lazy expiry cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_token(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query(r"DELETE FROM store.api_token WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Verification codes (super-admin login)
    // =========================================================================

    /// Store a verification code for a user, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn store_verification_code(
        &self,
        user_id: UserId,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO store.verification_code (user_id, code, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET code = EXCLUDED.code,
                          expires_at = EXCLUDED.expires_at,
                          created_at = now()
            ",
        )
        .bind(user_id.as_i32())
        .bind(code)
        .bind(expires_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Fetch the pending verification code for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_verification_code(
        &self,
        user_id: UserId,
    ) -> Result<Option<VerificationCode>, RepositoryError> {
        let row = sqlx::query_as::<_, VerificationCode>(
            r"
            SELECT user_id, code, expires_at, created_at
            FROM store.verification_code
            WHERE user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a user's verification code (after consumption or expiry).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_verification_code(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query(r"DELETE FROM store.verification_code WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
