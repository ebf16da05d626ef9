//! Admin category CRUD.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;

use backoffice_core::{CategoryId, Permission};

use crate::db::CategoryRepository;
use crate::db::categories::CategoryInput;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Category;
use crate::state::AppState;

use super::super::ApiResponse;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete_one))
}

#[derive(Debug, Deserialize)]
struct CategoryBody {
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    #[serde(default = "default_true")]
    is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl CategoryBody {
    fn validate(&self) -> Result<CategoryInput, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Category name is required".to_owned()));
        }
        Ok(CategoryInput {
            name: self.name.trim().to_owned(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            is_active: self.is_active,
        })
    }
}

async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    user.require(Permission::ManageCategories)?;
    let categories = CategoryRepository::new(state.pool()).list(false).await?;
    Ok(ApiResponse::ok(categories))
}

async fn get_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    user.require(Permission::ManageCategories)?;
    let category = CategoryRepository::new(state.pool())
        .get_by_id(CategoryId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_owned()))?;
    Ok(ApiResponse::ok(category))
}

async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    user.require(Permission::ManageCategories)?;
    let input = body.validate()?;
    let category = CategoryRepository::new(state.pool()).create(&input).await?;
    Ok(ApiResponse::ok(category))
}

async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    user.require(Permission::ManageCategories)?;
    let input = body.validate()?;
    let category = CategoryRepository::new(state.pool())
        .update(CategoryId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(category))
}

async fn delete_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManageCategories)?;
    CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;
    Ok(ApiResponse::message("Category deleted"))
}
