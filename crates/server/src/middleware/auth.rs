//! Token auth gate: bearer-token authentication for admin routes.
//!
//! Provides the [`RequireAuth`] extractor that resolves the presented
//! `Authorization: Bearer <token>` header into a [`CurrentUser`] or rejects
//! the request with a structured JSON error.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Extractor that requires a valid session token.
///
/// Resolution order:
/// 1. Extract the bearer token; missing/empty tokens (including the literal
///    strings `null`/`undefined` some clients send) are rejected with 401.
/// 2. Look the token up; unknown tokens are rejected with 401.
/// 3. An expired token is deleted on the spot (lazy cleanup) and rejected
///    with 401.
/// 4. The owning user is loaded LEFT JOINed with its role; a missing role
///    yields an empty permission set, and malformed permission data never
///    fails the request.
/// 5. A disabled account (`is_active = false`) is rejected with 403.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Pull the bearer token out of the `Authorization` header.
///
/// Returns `None` for a missing header, a non-Bearer scheme, an empty
/// token, or the junk literals `"null"`/`"undefined"`.
fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() || token == "null" || token == "undefined" {
        return None;
    }

    Some(token)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_bearer_token(parts) else {
            return Err(AppError::Unauthorized("No token provided".to_owned()));
        };

        let users = UserRepository::new(state.pool());

        let session = users
            .find_token(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_owned()))?;

        if let Some(expires_at) = session.expires_at
            && expires_at < Utc::now()
        {
            // Lazy cleanup: the expired row is removed on first use
            users.delete_token(token).await?;
            return Err(AppError::Unauthorized("Expired token".to_owned()));
        }

        let identity = users
            .load_identity(session.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_owned()))?;

        if !identity.is_active {
            return Err(AppError::Forbidden("Account disabled".to_owned()));
        }

        Ok(Self(CurrentUser {
            id: identity.id,
            email: identity.email,
            name: identity.name,
            role_id: identity.role_id,
            role_name: identity.role_name,
            is_active: identity.is_active,
            permissions: identity.permissions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/admin/orders");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[test]
    fn test_extract_bearer_token() {
        let parts = parts_with_auth(Some("Bearer abc123"));
        assert_eq!(extract_bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let parts = parts_with_auth(None);
        assert_eq!(extract_bearer_token(&parts), None);
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let parts = parts_with_auth(Some("Bearer "));
        assert_eq!(extract_bearer_token(&parts), None);
    }

    #[test]
    fn test_null_and_undefined_literals_are_rejected() {
        for junk in ["Bearer null", "Bearer undefined"] {
            let parts = parts_with_auth(Some(junk));
            assert_eq!(extract_bearer_token(&parts), None, "{junk}");
        }
    }

    #[test]
    fn test_non_bearer_scheme_is_rejected() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_bearer_token(&parts), None);
    }
}
