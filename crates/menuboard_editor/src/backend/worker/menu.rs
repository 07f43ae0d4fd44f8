//! Menu command handlers for the editor backend worker.

use super::{error_message, WorkerState};
use crate::backend::{CoreErrorSource, CoreEvent};
use menuboard_core::db::TransactionOps;
use menuboard_core::layout::MenuPatch;
use menuboard_core::models::menu::Menu;
use menuboard_core::AppError;
use tracing::{info, warn};

pub(super) fn handle_list(state: &mut WorkerState) {
    match state.db.menus.list() {
        Ok(items) => state.send(CoreEvent::MenusLoaded { items }),
        Err(err) => state.send_error(
            CoreErrorSource::Menu,
            format!("List failed: {}", error_message(&err)),
        ),
    }
}

pub(super) fn handle_create(state: &mut WorkerState) {
    let menu = Menu::new();
    match state.db.menus.create(&menu) {
        Ok(()) => {
            info!("created menu {}", menu.id);
            state.send(CoreEvent::MenuCreated { menu });
        }
        Err(err) => state.send_error(
            CoreErrorSource::Menu,
            format!("Create failed: {}", error_message(&err)),
        ),
    }
}

pub(super) fn handle_load(state: &mut WorkerState, id: String) {
    match state.db.menu_with_items(&id) {
        Ok(data) => state.send(CoreEvent::MenuLoaded { data }),
        Err(AppError::NotFound) => state.send(CoreEvent::MenuMissing { id }),
        Err(err) => state.send_error(
            CoreErrorSource::Menu,
            format!("Load failed: {}", error_message(&err)),
        ),
    }
}

pub(super) fn handle_update(state: &mut WorkerState, seq: u64, id: String, patch: MenuPatch) {
    match state.db.update_menu(&id, &patch) {
        Ok(menu) => state.send(CoreEvent::MenuSaved { seq, menu }),
        Err(err) => {
            let message = error_message(&err);
            warn!("menu update {} for {} rejected: {}", seq, id, message);
            state.send(CoreEvent::MenuSaveFailed { seq, message });
        }
    }
}

pub(super) fn handle_delete(state: &mut WorkerState, id: String) {
    match TransactionOps::delete_menu(&state.db, &id) {
        Ok(true) => state.send(CoreEvent::MenuDeleted { id }),
        Ok(false) => state.send(CoreEvent::MenuMissing { id }),
        Err(err) => state.send_error(
            CoreErrorSource::Menu,
            format!("Delete failed: {}", error_message(&err)),
        ),
    }
}
