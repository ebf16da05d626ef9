//! Authentication endpoints.
//!
//! - `POST /api/auth/register` - create a pending account
//! - `POST /api/auth/login` - check credentials, issue a token or start the
//!   super-admin verification flow
//! - `POST /api/auth/verify-superadmin` - exchange a code for the real token
//! - `POST /api/auth/resend-superadmin-code` - rotate and re-send the code
//! - `POST /api/auth/logout` - delete the presented token
//! - `GET /api/auth/me` - the authenticated identity
//! - `GET /api/auth/status` - lightweight active-flag check for the
//!   pending-approval screen (reachable by inactive accounts)

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::UserId;

use crate::db::UserRepository;
use crate::db::users::UserIdentity;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, LoginOutcome};
use crate::state::AppState;

use super::ApiResponse;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify-superadmin", post(verify_superadmin))
        .route("/api/auth/resend-superadmin-code", post(resend_superadmin_code))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/status", get(status))
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    /// Email or display name, matched case-insensitively.
    identifier: String,
    password: String,
    #[serde(default)]
    remember_me: bool,
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    user_id: i32,
    code: String,
    #[serde(default)]
    remember_me: bool,
}

#[derive(Debug, Deserialize)]
struct ResendRequest {
    user_id: i32,
}

/// The user block of a login/session response.
#[derive(Debug, Serialize)]
struct UserPayload {
    id: i32,
    name: String,
    email: String,
    role_id: Option<i32>,
    role_name: Option<String>,
    is_active: bool,
    permissions: Vec<&'static str>,
}

impl From<&UserIdentity> for UserPayload {
    fn from(identity: &UserIdentity) -> Self {
        Self {
            id: identity.id.as_i32(),
            name: identity.name.clone(),
            email: identity.email.as_str().to_owned(),
            role_id: identity.role_id.map(|r| r.as_i32()),
            role_name: identity.role_name.clone(),
            is_active: identity.is_active,
            permissions: identity.permissions.as_strings(),
        }
    }
}

/// The identity returned before verification: no permissions yet.
#[derive(Debug, Serialize)]
struct BareUserPayload {
    id: i32,
    name: String,
    email: String,
    role_id: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LoginResponse {
    Session {
        token: String,
        expires_at: Option<DateTime<Utc>>,
        user: UserPayload,
    },
    VerificationRequired {
        requires_verification: bool,
        user: BareUserPayload,
    },
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new pending account.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_owned()));
    }

    let auth = AuthService::new(state.pool());
    let user = auth
        .register(body.name.trim(), body.email.trim(), &body.password)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "is_active": user.is_active,
    })))
}

/// Check credentials and issue a session or start verification.
///
/// A pending account (`is_active = false`) still receives a token; the
/// client inspects `user.is_active` and routes to its approval screen.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let auth = AuthService::new(state.pool());
    let outcome = auth
        .login(body.identifier.trim(), &body.password, body.remember_me)
        .await?;

    match outcome {
        LoginOutcome::Session { identity, token } => {
            Ok(ApiResponse::ok(LoginResponse::Session {
                token: token.token,
                expires_at: token.expires_at,
                user: UserPayload::from(&identity),
            }))
        }
        LoginOutcome::VerificationRequired { identity, code } => {
            state
                .email()
                .send_verification_code(
                    &state.config().operator_email,
                    &identity.name,
                    &code,
                )
                .await?;

            Ok(ApiResponse::ok(LoginResponse::VerificationRequired {
                requires_verification: true,
                user: BareUserPayload {
                    id: identity.id.as_i32(),
                    name: identity.name,
                    email: identity.email.into_inner(),
                    role_id: identity.role_id.map(|r| r.as_i32()),
                },
            }))
        }
    }
}

/// Exchange a verification code for the real session token.
async fn verify_superadmin(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let auth = AuthService::new(state.pool());
    let (identity, token) = auth
        .verify_superadmin(UserId::new(body.user_id), body.code.trim(), body.remember_me)
        .await?;

    Ok(ApiResponse::ok(LoginResponse::Session {
        token: token.token,
        expires_at: token.expires_at,
        user: UserPayload::from(&identity),
    }))
}

/// Rotate the verification code and e-mail it to the operator again.
async fn resend_superadmin_code(
    State(state): State<AppState>,
    Json(body): Json<ResendRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let auth = AuthService::new(state.pool());
    let (identity, code) = auth
        .resend_superadmin_code(UserId::new(body.user_id))
        .await?;

    state
        .email()
        .send_verification_code(&state.config().operator_email, &identity.name, &code)
        .await?;

    Ok(ApiResponse::message("Verification code sent"))
}

/// Delete the presented token. Succeeds even when no valid token was sent,
/// so clients can always clear their local session.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if let Some(token) = bearer_from_headers(&headers) {
        let auth = AuthService::new(state.pool());
        auth.logout(token).await?;
    }

    Ok(ApiResponse::message("Logged out"))
}

/// The authenticated identity with permissions.
async fn me(RequireAuth(user): RequireAuth) -> Json<ApiResponse<CurrentUser>> {
    ApiResponse::ok(user)
}

/// Lightweight account-state check for the pending-approval screen.
///
/// Unlike the auth gate this does NOT reject inactive accounts; a pending
/// user polls here until an admin approves them. Expired tokens are still
/// cleaned up and rejected.
async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let Some(token) = bearer_from_headers(&headers) else {
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
        users.delete_token(token).await?;
        return Err(AppError::Unauthorized("Expired token".to_owned()));
    }

    let identity = users
        .load_identity(session.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_owned()))?;

    Ok(ApiResponse::ok(serde_json::json!({
        "id": identity.id.as_i32(),
        "is_active": identity.is_active,
    })))
}

/// Extract a bearer token from request headers, ignoring junk values.
fn bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() || token == "null" || token == "undefined" {
        return None;
    }
    Some(token)
}
