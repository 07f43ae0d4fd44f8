//! Menu item HTTP handlers.

use super::{json_body, run_blocking, SuccessResponse};
use crate::{error::HttpError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use menuboard_core::db::TransactionOps;
use menuboard_core::models::item::{
    CreateItemRequest, MenuItem, ReorderRequest, UpdateItemRequest,
};

/// List a menu's items ascending by position.
///
/// # Errors
/// Returns 404 when the menu does not exist.
pub async fn list_items(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
) -> Result<Json<Vec<MenuItem>>, HttpError> {
    Ok(Json(state.db.items_for_menu(&menu_id)?))
}

/// Append an item or category header to a menu.
///
/// # Returns
/// `201 Created` with the stored item.
///
/// # Errors
/// Returns 400 for invalid input and 404 when the menu does not exist.
pub async fn create_item(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuItem>), HttpError> {
    let new_item = json_body(payload)?.validate()?;
    let db = state.db.clone();
    let item = run_blocking(move || TransactionOps::add_item(&db, &menu_id, new_item)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Move an item one slot up or down.
///
/// # Returns
/// The menu's full item list in its new order.
///
/// # Errors
/// Returns 400 for a malformed request or an edge move and 404 when the item
/// is not on this menu.
pub async fn reorder_items(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<Vec<MenuItem>>, HttpError> {
    let req = payload
        .map(|Json(req)| req)
        .map_err(|_| HttpError::bad_request("itemId and direction are required."))?;
    let (item_id, direction) = req.resolve()?;
    let db = state.db.clone();
    let items = run_blocking(move || TransactionOps::move_item(&db, &menu_id, &item_id, direction))
        .await?;
    Ok(Json(items))
}

/// Edit an item's name and/or price.
///
/// # Errors
/// Returns 400 for invalid input and 404 when the item is not on this menu.
pub async fn update_item(
    State(state): State<AppState>,
    Path((menu_id, item_id)): Path<(String, String)>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<MenuItem>, HttpError> {
    let req = json_body(payload)?;
    Ok(Json(state.db.items.update(&menu_id, &item_id, &req)?))
}

/// Remove an item; remaining positions are left untouched.
///
/// # Errors
/// Returns 404 when the item is not on this menu.
pub async fn delete_item(
    State(state): State<AppState>,
    Path((menu_id, item_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let db = state.db.clone();
    run_blocking(move || TransactionOps::delete_item(&db, &menu_id, &item_id)).await?;
    Ok(SuccessResponse::ok())
}
