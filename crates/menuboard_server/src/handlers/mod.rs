//! HTTP request handlers.

/// Admin page payloads.
pub mod admin;
/// Login and logout.
pub mod auth;
/// Menu item endpoints.
pub mod item;
/// Menu endpoints.
pub mod menu;
/// Image uploads.
pub mod upload;

use crate::error::HttpError;
use axum::{extract::rejection::JsonRejection, Json};
use menuboard_core::AppError;
use serde::Serialize;

/// Unwrap a JSON body, turning extractor rejections into `{ "error": ... }` responses.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload.map(|Json(value)| value).map_err(HttpError::from)
}

/// Run storage work that may wait on a per-menu lock off the async workers.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, HttpError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| {
            tracing::error!("Blocking storage task failed: {}", err);
            HttpError::from(AppError::Internal)
        })?
        .map_err(HttpError::from)
}

/// Body returned by mutations without a richer payload.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}
