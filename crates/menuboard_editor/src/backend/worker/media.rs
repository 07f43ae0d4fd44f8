//! Upload and snapshot handlers for the editor backend worker.

use super::{error_message, WorkerState};
use crate::backend::{CoreErrorSource, CoreEvent};
use crate::render::{render_png, SnapshotAssets};
use menuboard_core::models::MenuWithItems;
use tracing::{error, warn};

pub(super) fn handle_upload(state: &mut WorkerState, upload_id: u64, mime: String, bytes: Vec<u8>) {
    match state.uploads.store(&mime, &bytes) {
        Ok(path) => state.send(CoreEvent::ImageUploaded { upload_id, path }),
        Err(err) => {
            let message = error_message(&err);
            warn!("upload {} rejected: {}", upload_id, message);
            state.send(CoreEvent::UploadFailed { upload_id, message });
        }
    }
}

pub(super) fn handle_snapshot(state: &mut WorkerState, snapshot: MenuWithItems, container_width: u32) {
    let assets = SnapshotAssets::load(&state.uploads, &snapshot.menu);
    match render_png(&snapshot, container_width, &assets) {
        Ok(png) => state.send(CoreEvent::SnapshotReady {
            menu_id: snapshot.menu.id,
            png,
            rendered_at: chrono::Utc::now(),
        }),
        Err(err) => {
            error!("snapshot export failed: {}", err);
            state.send_error(CoreErrorSource::Snapshot, format!("Export failed: {}", err));
        }
    }
}
