//! Protocol types for the editor backend worker.

use chrono::{DateTime, Utc};
use menuboard_core::layout::MenuPatch;
use menuboard_core::models::{
    item::{CreateItemRequest, MenuItem, MoveDirection, UpdateItemRequest},
    menu::Menu,
    MenuWithItems,
};

/// Commands issued by the editing client for the backend worker to execute.
#[derive(Debug)]
pub enum CoreCmd {
    /// Load every menu, newest first.
    ListMenus,
    /// Create a draft menu with default appearance.
    CreateMenu,
    /// Load one menu with its ordered items.
    LoadMenu { id: String },
    /// Persist a sparse menu update.
    ///
    /// `seq` is echoed back so the draft can tell stale acknowledgements apart.
    UpdateMenu {
        seq: u64,
        id: String,
        patch: MenuPatch,
    },
    /// Delete a menu and its items.
    DeleteMenu { id: String },
    AddItem {
        menu_id: String,
        request: CreateItemRequest,
    },
    UpdateItem {
        menu_id: String,
        item_id: String,
        request: UpdateItemRequest,
    },
    DeleteItem { menu_id: String, item_id: String },
    /// Swap an item with its neighbour.
    MoveItem {
        menu_id: String,
        item_id: String,
        direction: MoveDirection,
    },
    /// Store an uploaded image and report its public path.
    ///
    /// `upload_id` is echoed back on success or failure.
    UploadImage {
        upload_id: u64,
        mime: String,
        bytes: Vec<u8>,
    },
    /// Rasterize the given state to PNG.
    RenderSnapshot {
        state: MenuWithItems,
        container_width: u32,
    },
}

/// Which kind of operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorSource {
    Menu,
    Items,
    Snapshot,
}

/// Events produced by the backend worker and polled by the editing client.
#[derive(Debug)]
pub enum CoreEvent {
    MenusLoaded { items: Vec<Menu> },
    MenuCreated { menu: Menu },
    MenuLoaded { data: MenuWithItems },
    /// The update tagged `seq` was stored; `menu` is the server record.
    MenuSaved { seq: u64, menu: Menu },
    /// The update tagged `seq` was rejected; nothing was written.
    MenuSaveFailed { seq: u64, message: String },
    MenuDeleted { id: String },
    /// The requested menu no longer exists.
    MenuMissing { id: String },
    /// The item list of `menu_id` after an add/update/delete/move.
    ItemsChanged {
        menu_id: String,
        items: Vec<MenuItem>,
    },
    ImageUploaded { upload_id: u64, path: String },
    /// The upload tagged `upload_id` was rejected; nothing was stored.
    UploadFailed { upload_id: u64, message: String },
    SnapshotReady {
        menu_id: String,
        png: Vec<u8>,
        rendered_at: DateTime<Utc>,
    },
    Error {
        source: CoreErrorSource,
        message: String,
    },
}
