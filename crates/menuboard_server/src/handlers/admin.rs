//! Payloads for the guarded admin pages.

use crate::{auth::is_authenticated, error::HttpError, AppState};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use menuboard_core::models::{menu::Menu, MenuWithItems};
use menuboard_core::AppError;

/// Dashboard data: every menu, newest first.
///
/// # Errors
/// Returns an error if listing fails.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Vec<Menu>>, HttpError> {
    Ok(Json(state.db.menus.list()?))
}

/// Editor data for one menu.
///
/// # Errors
/// Returns 404 when the menu does not exist.
pub async fn editor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuWithItems>, HttpError> {
    Ok(Json(state.db.menu_with_items(&id)?))
}

/// Unmatched paths. Anything under `/admin` still requires a session, so
/// anonymous visitors are sent to `/login` instead of seeing a 404.
pub async fn fallback(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path();
    let under_admin = path == "/admin" || path.starts_with("/admin/");
    if under_admin && !is_authenticated(&state, &headers) {
        return Redirect::to("/login").into_response();
    }
    HttpError::from(AppError::NotFound).into_response()
}
