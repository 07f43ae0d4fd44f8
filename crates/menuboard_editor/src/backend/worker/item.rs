//! Item command handlers for the editor backend worker.
//!
//! Every successful mutation answers with the menu's full ordered list so the
//! client never has to patch its copy locally.

use super::{error_message, WorkerState};
use crate::backend::{CoreErrorSource, CoreEvent};
use menuboard_core::db::TransactionOps;
use menuboard_core::models::item::{CreateItemRequest, MoveDirection, UpdateItemRequest};
use menuboard_core::AppError;

fn send_items(state: &WorkerState, menu_id: String) {
    match state.db.items_for_menu(&menu_id) {
        Ok(items) => state.send(CoreEvent::ItemsChanged { menu_id, items }),
        Err(err) => state.send_error(
            CoreErrorSource::Items,
            format!("Reload failed: {}", error_message(&err)),
        ),
    }
}

fn report(state: &WorkerState, menu_id: String, action: &str, result: Result<(), AppError>) {
    match result {
        Ok(()) => send_items(state, menu_id),
        Err(err) => state.send_error(
            CoreErrorSource::Items,
            format!("{} failed: {}", action, error_message(&err)),
        ),
    }
}

pub(super) fn handle_add(state: &mut WorkerState, menu_id: String, request: CreateItemRequest) {
    let result = request
        .validate()
        .and_then(|new_item| TransactionOps::add_item(&state.db, &menu_id, new_item))
        .map(|_| ());
    report(state, menu_id, "Add", result);
}

pub(super) fn handle_update(
    state: &mut WorkerState,
    menu_id: String,
    item_id: String,
    request: UpdateItemRequest,
) {
    let result = state
        .db
        .items
        .update(&menu_id, &item_id, &request)
        .map(|_| ());
    report(state, menu_id, "Update", result);
}

pub(super) fn handle_delete(state: &mut WorkerState, menu_id: String, item_id: String) {
    let result = TransactionOps::delete_item(&state.db, &menu_id, &item_id);
    report(state, menu_id, "Delete", result);
}

pub(super) fn handle_move(
    state: &mut WorkerState,
    menu_id: String,
    item_id: String,
    direction: MoveDirection,
) {
    match TransactionOps::move_item(&state.db, &menu_id, &item_id, direction) {
        Ok(items) => state.send(CoreEvent::ItemsChanged { menu_id, items }),
        Err(err) => state.send_error(
            CoreErrorSource::Items,
            format!("Move failed: {}", error_message(&err)),
        ),
    }
}
