//! Background worker thread for database, upload, and rendering work.

mod item;
mod media;
mod menu;

use crate::backend::{CoreCmd, CoreErrorSource, CoreEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use menuboard_core::uploads::UploadStore;
use menuboard_core::{AppError, Database};
use std::thread;

/// Handle for sending commands to, and receiving events from, the backend worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<CoreCmd>,
    pub evt_rx: Receiver<CoreEvent>,
}

pub(super) struct WorkerState {
    db: Database,
    uploads: UploadStore,
    evt_tx: Sender<CoreEvent>,
}

impl WorkerState {
    fn send(&self, event: CoreEvent) {
        // The client may already be gone during shutdown.
        let _ = self.evt_tx.send(event);
    }

    fn send_error(&self, source: CoreErrorSource, message: String) {
        self.send(CoreEvent::Error { source, message });
    }
}

/// Operator-facing text for a storage error, matching the HTTP API wording.
pub(crate) fn error_message(err: &AppError) -> String {
    match err {
        AppError::Validation(message) => message.clone(),
        AppError::InvalidMove(_) => "Cannot move item further.".to_string(),
        AppError::NotFound => "Not found".to_string(),
        other => {
            tracing::error!("backend storage failure: {}", other);
            "Internal server error".to_string()
        }
    }
}

fn dispatch(state: &mut WorkerState, cmd: CoreCmd) {
    match cmd {
        CoreCmd::ListMenus => menu::handle_list(state),
        CoreCmd::CreateMenu => menu::handle_create(state),
        CoreCmd::LoadMenu { id } => menu::handle_load(state, id),
        CoreCmd::UpdateMenu { seq, id, patch } => menu::handle_update(state, seq, id, patch),
        CoreCmd::DeleteMenu { id } => menu::handle_delete(state, id),
        CoreCmd::AddItem { menu_id, request } => item::handle_add(state, menu_id, request),
        CoreCmd::UpdateItem {
            menu_id,
            item_id,
            request,
        } => item::handle_update(state, menu_id, item_id, request),
        CoreCmd::DeleteItem { menu_id, item_id } => item::handle_delete(state, menu_id, item_id),
        CoreCmd::MoveItem {
            menu_id,
            item_id,
            direction,
        } => item::handle_move(state, menu_id, item_id, direction),
        CoreCmd::UploadImage {
            upload_id,
            mime,
            bytes,
        } => media::handle_upload(state, upload_id, mime, bytes),
        CoreCmd::RenderSnapshot {
            state: snapshot,
            container_width,
        } => media::handle_snapshot(state, snapshot, container_width),
    }
}

/// Spawn the backend worker thread that performs blocking storage and image work.
///
/// Commands are processed strictly in the order they are sent; each one
/// produces at least one [`CoreEvent`].
///
/// # Arguments
/// - `db`: Open database handle, moved onto the worker.
/// - `uploads`: Store used for image uploads and snapshot backgrounds.
///
/// # Returns
/// A [`BackendHandle`] containing the command sender and event receiver.
///
/// # Errors
/// Returns an error if the worker thread cannot be spawned.
pub fn spawn_backend(db: Database, uploads: UploadStore) -> std::io::Result<BackendHandle> {
    let (cmd_tx, cmd_rx) = unbounded::<CoreCmd>();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("menuboard-editor-backend".to_string())
        .spawn(move || {
            let mut state = WorkerState {
                db,
                uploads,
                evt_tx,
            };
            for cmd in cmd_rx.iter() {
                dispatch(&mut state, cmd);
            }
            tracing::debug!("editor backend stopped");
        })?;

    Ok(BackendHandle { cmd_tx, evt_rx })
}
