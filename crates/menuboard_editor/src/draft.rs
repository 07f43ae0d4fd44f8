//! Two-tier editing state for one menu.
//!
//! `confirmed` mirrors the last record the store acknowledged; `visible` is
//! what the preview draws. Menu fields are edited optimistically and tracked
//! per field by the sequence number of their latest submitted write, so a
//! late acknowledgement never overwrites a newer edit and a rejected write
//! only rolls back the fields it still owns. Item lists are never edited
//! locally; they change only when the backend reports the stored list.

use crate::backend::{CoreCmd, CoreEvent};
use crate::drag::OverlayCommit;
use crate::render::display_title;
use menuboard_core::layout::{overlay_position_patch, ImageField, LayoutField, MenuPatch};
use menuboard_core::models::item::{CreateItemRequest, MoveDirection, UpdateItemRequest};
use menuboard_core::models::menu::{Menu, MenuStatus};
use menuboard_core::models::MenuWithItems;
use std::collections::{HashMap, HashSet};

/// One independently saved menu control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Status,
    Number(LayoutField),
    Image(ImageField),
}

impl DraftField {
    /// Every menu field the editor can change.
    pub fn all() -> impl Iterator<Item = DraftField> {
        [Self::Title, Self::Status]
            .into_iter()
            .chain(ImageField::ALL.into_iter().map(Self::Image))
            .chain(LayoutField::ALL.into_iter().map(Self::Number))
    }

    /// Fields a patch writes.
    pub fn touched_by(patch: &MenuPatch) -> Vec<DraftField> {
        let mut fields = Vec::new();
        if patch.title.is_some() {
            fields.push(Self::Title);
        }
        if patch.status.is_some() {
            fields.push(Self::Status);
        }
        fields.extend(patch.image_fields().into_iter().map(Self::Image));
        fields.extend(patch.numeric_fields().into_iter().map(Self::Number));
        fields
    }

    fn copy(self, from: &Menu, to: &mut Menu) {
        match self {
            Self::Title => to.title = from.title.clone(),
            Self::Status => to.status = from.status,
            Self::Number(field) => field.set(to, field.get(from)),
            Self::Image(field) => field.set(to, field.get(from).map(str::to_string)),
        }
    }
}

/// Apply the representable values of `patch` to `menu` for display.
fn preview_patch(patch: &MenuPatch, menu: &mut Menu) {
    if let Some(title) = &patch.title {
        menu.title = title.clone();
    }
    if let Some(status) = patch.status.as_deref().and_then(|raw| raw.parse().ok()) {
        menu.status = status;
    }
    for field in ImageField::ALL {
        if let Some(value) = field.raw(patch) {
            field.set(menu, value.clone());
        }
    }
    for field in LayoutField::ALL {
        if let Some(value) = field.raw(patch).and_then(|raw| u32::try_from(raw).ok()) {
            field.set(menu, value);
        }
    }
}

#[derive(Debug, Clone)]
pub struct DraftMenuState {
    confirmed: MenuWithItems,
    visible: MenuWithItems,
    next_seq: u64,
    /// Latest submitted write per field.
    latest: HashMap<DraftField, u64>,
    in_flight: HashSet<u64>,
    /// Fields changed locally but not yet submitted.
    staged: HashSet<DraftField>,
    next_upload: u64,
    /// Destination field of each upload not yet answered.
    pending_uploads: HashMap<u64, ImageField>,
    error: Option<String>,
}

impl DraftMenuState {
    /// Start editing from a freshly loaded record.
    pub fn new(data: MenuWithItems) -> Self {
        Self {
            visible: data.clone(),
            confirmed: data,
            next_seq: 0,
            latest: HashMap::new(),
            in_flight: HashSet::new(),
            staged: HashSet::new(),
            next_upload: 0,
            pending_uploads: HashMap::new(),
            error: None,
        }
    }

    pub fn menu_id(&self) -> &str {
        &self.confirmed.menu.id
    }

    pub fn confirmed(&self) -> &MenuWithItems {
        &self.confirmed
    }

    pub fn visible(&self) -> &MenuWithItems {
        &self.visible
    }

    /// Last failure message for inline display.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Whether a submitted write for `field` has not been answered yet.
    pub fn is_pending(&self, field: DraftField) -> bool {
        self.latest.contains_key(&field)
    }

    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Title as it would be saved: trimmed, or "New Menu" when blank.
    pub fn normalized_title(&self) -> String {
        display_title(&self.visible.menu.title).to_string()
    }

    pub fn stage_title(&mut self, title: impl Into<String>) {
        self.visible.menu.title = title.into();
        self.staged.insert(DraftField::Title);
    }

    pub fn stage_status(&mut self, status: MenuStatus) {
        self.visible.menu.status = status;
        self.staged.insert(DraftField::Status);
    }

    pub fn stage_number(&mut self, field: LayoutField, value: u32) {
        field.set(&mut self.visible.menu, value);
        self.staged.insert(DraftField::Number(field));
    }

    pub fn stage_image(&mut self, field: ImageField, path: Option<String>) {
        field.set(&mut self.visible.menu, path);
        self.staged.insert(DraftField::Image(field));
    }

    /// Submit a sparse update as one intent.
    ///
    /// The patch is shown immediately and becomes the latest writer of every
    /// field it touches.
    ///
    /// # Returns
    /// The command to send to the backend.
    pub fn submit(&mut self, patch: MenuPatch) -> CoreCmd {
        self.next_seq += 1;
        let seq = self.next_seq;
        for field in DraftField::touched_by(&patch) {
            self.latest.insert(field, seq);
            self.staged.remove(&field);
        }
        self.in_flight.insert(seq);
        preview_patch(&patch, &mut self.visible.menu);
        self.error = None;
        CoreCmd::UpdateMenu {
            seq,
            id: self.menu_id().to_string(),
            patch,
        }
    }

    /// Save the visible value of one control (blur, slider release, toggle).
    pub fn commit_field(&mut self, field: DraftField) -> CoreCmd {
        let menu = &self.visible.menu;
        let mut patch = MenuPatch::default();
        match field {
            DraftField::Title => patch.title = Some(self.normalized_title()),
            DraftField::Status => patch.status = Some(menu.status.as_str().to_string()),
            DraftField::Number(field) => patch.set_number(field, i64::from(field.get(menu))),
            DraftField::Image(field) => patch.set_image(field, field.get(menu).map(str::to_string)),
        }
        self.submit(patch)
    }

    /// Persist a finished overlay drag.
    pub fn commit_overlay(&mut self, commit: OverlayCommit) -> CoreCmd {
        self.submit(overlay_position_patch(
            commit.target,
            i64::from(commit.x),
            i64::from(commit.y),
        ))
    }

    pub fn add_item(&mut self, request: CreateItemRequest) -> CoreCmd {
        self.error = None;
        CoreCmd::AddItem {
            menu_id: self.menu_id().to_string(),
            request,
        }
    }

    pub fn update_item(&mut self, item_id: &str, request: UpdateItemRequest) -> CoreCmd {
        self.error = None;
        CoreCmd::UpdateItem {
            menu_id: self.menu_id().to_string(),
            item_id: item_id.to_string(),
            request,
        }
    }

    pub fn delete_item(&mut self, item_id: &str) -> CoreCmd {
        self.error = None;
        CoreCmd::DeleteItem {
            menu_id: self.menu_id().to_string(),
            item_id: item_id.to_string(),
        }
    }

    pub fn move_item(&mut self, item_id: &str, direction: MoveDirection) -> CoreCmd {
        self.error = None;
        CoreCmd::MoveItem {
            menu_id: self.menu_id().to_string(),
            item_id: item_id.to_string(),
            direction,
        }
    }

    /// Upload an image destined for `field`; the path is saved once stored.
    pub fn upload_image(&mut self, field: ImageField, mime: &str, bytes: Vec<u8>) -> CoreCmd {
        self.next_upload += 1;
        let upload_id = self.next_upload;
        self.pending_uploads.insert(upload_id, field);
        self.error = None;
        CoreCmd::UploadImage {
            upload_id,
            mime: mime.to_string(),
            bytes,
        }
    }

    /// Export what is currently visible.
    pub fn snapshot(&self, container_width: u32) -> CoreCmd {
        CoreCmd::RenderSnapshot {
            state: self.visible.clone(),
            container_width,
        }
    }

    fn keeps_local(&self, field: DraftField, seq: u64) -> bool {
        self.staged.contains(&field) || self.latest.get(&field).is_some_and(|latest| *latest > seq)
    }

    fn on_saved(&mut self, seq: u64, menu: &Menu) {
        self.in_flight.remove(&seq);
        let mut next = menu.clone();
        for field in DraftField::all() {
            if self.keeps_local(field, seq) {
                field.copy(&self.visible.menu, &mut next);
            } else if self.latest.get(&field).is_some_and(|latest| *latest <= seq) {
                self.latest.remove(&field);
            }
        }
        self.confirmed.menu = menu.clone();
        self.visible.menu = next;
    }

    fn on_failed(&mut self, seq: u64, message: &str) {
        self.in_flight.remove(&seq);
        for field in DraftField::all() {
            if self.latest.get(&field) != Some(&seq) {
                continue;
            }
            self.latest.remove(&field);
            if !self.staged.contains(&field) {
                field.copy(&self.confirmed.menu, &mut self.visible.menu);
            }
        }
        self.error = Some(message.to_string());
    }

    /// Fold a backend event into the draft.
    ///
    /// Events for other menus and acknowledgements this draft never issued are
    /// ignored.
    ///
    /// # Returns
    /// A follow-up command to send, when the event completes the first half of
    /// a two-step intent (an upload whose path must now be saved).
    pub fn on_event(&mut self, event: &CoreEvent) -> Option<CoreCmd> {
        match event {
            CoreEvent::MenuSaved { seq, menu } => {
                if menu.id == self.menu_id() && self.in_flight.contains(seq) {
                    self.on_saved(*seq, menu);
                }
            }
            CoreEvent::MenuSaveFailed { seq, message } => {
                if self.in_flight.contains(seq) {
                    self.on_failed(*seq, message);
                }
            }
            CoreEvent::MenuLoaded { data } if data.menu.id == self.menu_id() => {
                *self = Self::new(data.clone());
            }
            CoreEvent::ItemsChanged { menu_id, items } if menu_id == self.menu_id() => {
                self.confirmed.items = items.clone();
                self.visible.items = items.clone();
            }
            CoreEvent::MenuMissing { id } if id == self.menu_id() => {
                self.error = Some("This menu no longer exists.".to_string());
            }
            CoreEvent::ImageUploaded { upload_id, path } => {
                if let Some(field) = self.pending_uploads.remove(upload_id) {
                    let mut patch = MenuPatch::default();
                    patch.set_image(field, Some(path.clone()));
                    return Some(self.submit(patch));
                }
            }
            CoreEvent::UploadFailed { upload_id, message } => {
                if self.pending_uploads.remove(upload_id).is_some() {
                    self.error = Some(message.clone());
                }
            }
            CoreEvent::Error { message, .. } => {
                self.error = Some(message.clone());
            }
            _ => {}
        }
        None
    }
}
