//! Image upload handler.

use super::run_blocking;
use crate::{error::HttpError, AppState};
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

/// Public path of a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: String,
}

/// Accept one image from the multipart field `file`.
///
/// # Returns
/// `{ "path": "/uploads/<file>" }`.
///
/// # Errors
/// Returns 400 when the field is missing, empty, or not a JPG/PNG/WEBP image.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| HttpError::bad_request(format!("Failed to read upload: {}", err)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let mime = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| HttpError::bad_request(format!("Failed to read upload: {}", err)))?;

        let uploads = state.uploads.clone();
        let path = run_blocking(move || uploads.store(&mime, &bytes)).await?;
        return Ok(Json(UploadResponse { path }));
    }

    Err(HttpError::bad_request("File is required."))
}
