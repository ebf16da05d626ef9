//! HTTP routes.
//!
//! Every endpoint returns the JSON envelope
//! `{success: boolean, data?/message?/error?}`; error rendering lives in
//! [`crate::error::AppError`].

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod public;

use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// The success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A `{success: true, data}` response.
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }
}

impl ApiResponse<()> {
    /// A `{success: true, message}` response with no data.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(message.into()),
        })
    }
}

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/api/admin", admin::router())
        .nest("/api/public", public::router())
}
