//! Menu HTTP handlers.

use super::{json_body, run_blocking, SuccessResponse};
use crate::{error::HttpError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use menuboard_core::db::TransactionOps;
use menuboard_core::layout::MenuPatch;
use menuboard_core::models::{menu::Menu, MenuWithItems};
use menuboard_core::AppError;

/// List menus, newest first.
///
/// # Errors
/// Returns an error if listing fails.
pub async fn list_menus(State(state): State<AppState>) -> Result<Json<Vec<Menu>>, HttpError> {
    Ok(Json(state.db.menus.list()?))
}

/// Create a draft menu with default appearance.
///
/// # Returns
/// `201 Created` with the new menu.
///
/// # Errors
/// Returns an error if persistence fails.
pub async fn create_menu(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Menu>), HttpError> {
    let menu = Menu::new();
    state.db.menus.create(&menu)?;
    Ok((StatusCode::CREATED, Json(menu)))
}

/// Fetch a menu with its ordered items.
///
/// # Errors
/// Returns 404 when the menu does not exist.
pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuWithItems>, HttpError> {
    Ok(Json(state.db.menu_with_items(&id)?))
}

/// Apply a sparse update to a menu.
///
/// # Returns
/// The updated menu.
///
/// # Errors
/// Returns 400 for any invalid field (nothing is written) and 404 when the
/// menu does not exist.
pub async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MenuPatch>, JsonRejection>,
) -> Result<Json<Menu>, HttpError> {
    let patch = json_body(payload)?;
    Ok(Json(state.db.update_menu(&id, &patch)?))
}

/// Delete a menu and all of its items.
///
/// # Errors
/// Returns 404 when the menu does not exist.
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let db = state.db.clone();
    if run_blocking(move || TransactionOps::delete_menu(&db, &id)).await? {
        Ok(SuccessResponse::ok())
    } else {
        Err(AppError::NotFound.into())
    }
}
