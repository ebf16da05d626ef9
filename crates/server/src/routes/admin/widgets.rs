//! Admin widget CRUD.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;

use backoffice_core::{Permission, WidgetId};

use crate::db::WidgetRepository;
use crate::db::widgets::WidgetInput;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Widget;
use crate::state::AppState;

use super::super::ApiResponse;

/// Build the widgets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete_one))
}

#[derive(Debug, Deserialize)]
struct WidgetBody {
    title: String,
    widget_type: String,
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default)]
    sort_order: i32,
    #[serde(default = "default_true")]
    is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl WidgetBody {
    fn validate(&self) -> Result<WidgetInput, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_owned()));
        }
        if self.widget_type.trim().is_empty() {
            return Err(AppError::Validation("Widget type is required".to_owned()));
        }
        Ok(WidgetInput {
            title: self.title.trim().to_owned(),
            widget_type: self.widget_type.trim().to_owned(),
            content: self.content.clone(),
            sort_order: self.sort_order,
            is_active: self.is_active,
        })
    }
}

async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Widget>>>, AppError> {
    user.require(Permission::ManageWidgets)?;
    let widgets = WidgetRepository::new(state.pool()).list(false).await?;
    Ok(ApiResponse::ok(widgets))
}

async fn get_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Widget>>, AppError> {
    user.require(Permission::ManageWidgets)?;
    let widget = WidgetRepository::new(state.pool())
        .get_by_id(WidgetId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Widget".to_owned()))?;
    Ok(ApiResponse::ok(widget))
}

async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<WidgetBody>,
) -> Result<Json<ApiResponse<Widget>>, AppError> {
    user.require(Permission::ManageWidgets)?;
    let input = body.validate()?;
    let widget = WidgetRepository::new(state.pool()).create(&input).await?;
    Ok(ApiResponse::ok(widget))
}

async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<WidgetBody>,
) -> Result<Json<ApiResponse<Widget>>, AppError> {
    user.require(Permission::ManageWidgets)?;
    let input = body.validate()?;
    let widget = WidgetRepository::new(state.pool())
        .update(WidgetId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(widget))
}

async fn delete_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManageWidgets)?;
    WidgetRepository::new(state.pool())
        .delete(WidgetId::new(id))
        .await?;
    Ok(ApiResponse::message("Widget deleted"))
}
