//! Admin review moderation.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use backoffice_core::{Permission, ReviewId};

use crate::db::ReviewRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Review;
use crate::state::AppState;

use super::super::ApiResponse;

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", axum::routing::delete(delete_one))
}

async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Review>>>, AppError> {
    user.require(Permission::ManageReviews)?;
    let reviews = ReviewRepository::new(state.pool()).list_all().await?;
    Ok(ApiResponse::ok(reviews))
}

async fn delete_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManageReviews)?;
    ReviewRepository::new(state.pool())
        .delete(ReviewId::new(id))
        .await?;
    Ok(ApiResponse::message("Review deleted"))
}
