//! Admin user administration: approval, role assignment, CRUD.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Deserialize;

use backoffice_core::{Email, Permission, RoleId, UserId};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{Role, User};
use crate::services::auth::hash_password;
use crate::state::AppState;

use super::super::ApiResponse;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/roles", get(list_roles))
        .route("/{id}", get(get_one).put(update).delete(delete_one))
        .route("/{id}/status", put(set_status))
}

#[derive(Debug, Deserialize)]
struct CreateUserBody {
    name: String,
    email: String,
    password: String,
    role_id: Option<i32>,
    #[serde(default)]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct UpdateUserBody {
    name: String,
    role_id: Option<i32>,
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    is_active: bool,
}

async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    user.require(Permission::ManageUsers)?;
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(ApiResponse::ok(users))
}

async fn list_roles(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Role>>>, AppError> {
    user.require(Permission::ManageUsers)?;
    let roles = UserRepository::new(state.pool()).list_roles().await?;
    Ok(ApiResponse::ok(roles))
}

async fn get_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    user.require(Permission::ManageUsers)?;
    let found = UserRepository::new(state.pool())
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_owned()))?;
    Ok(ApiResponse::ok(found))
}

/// Create a user directly (operator-created accounts may start active,
/// unlike self-registration).
async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    user.require(Permission::ManageUsers)?;

    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_owned()));
    }
    let email =
        Email::parse(body.email.trim()).map_err(|e| AppError::Validation(e.to_string()))?;
    if body.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash = hash_password(&body.password)
        .map_err(|_| AppError::Internal("password hashing failed".to_owned()))?;

    let repo = UserRepository::new(state.pool());
    let created = repo
        .create(
            body.name.trim(),
            &email,
            &password_hash,
            body.role_id.map(RoleId::new),
        )
        .await?;

    // Self-registration always starts pending; operator-created accounts
    // may be activated immediately.
    let created = if body.is_active {
        repo.set_active(created.id, true).await?
    } else {
        created
    };

    Ok(ApiResponse::ok(created))
}

async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    user.require(Permission::ManageUsers)?;

    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_owned()));
    }

    let updated = UserRepository::new(state.pool())
        .update(
            UserId::new(id),
            body.name.trim(),
            body.role_id.map(RoleId::new),
            body.is_active,
        )
        .await?;

    Ok(ApiResponse::ok(updated))
}

/// Approve or disable an account.
async fn set_status(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    user.require(Permission::ManageUsers)?;
    let updated = UserRepository::new(state.pool())
        .set_active(UserId::new(id), body.is_active)
        .await?;
    Ok(ApiResponse::ok(updated))
}

async fn delete_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManageUsers)?;

    if user.id == UserId::new(id) {
        return Err(AppError::Validation(
            "Cannot delete your own account".to_owned(),
        ));
    }

    UserRepository::new(state.pool())
        .delete(UserId::new(id))
        .await?;
    Ok(ApiResponse::message("User deleted"))
}
