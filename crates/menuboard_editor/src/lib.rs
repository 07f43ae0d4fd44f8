//! Headless menu editor: backend worker, draft reconciliation, overlay
//! dragging, and preview rendering.

/// Worker thread and its command/event protocol.
pub mod backend;
/// Two-tier draft state.
pub mod draft;
/// Overlay drag state machine.
pub mod drag;
/// Layout, contrast, and PNG export.
pub mod render;

pub use backend::{spawn_backend, BackendHandle, CoreCmd, CoreErrorSource, CoreEvent};
pub use draft::{DraftField, DraftMenuState};
pub use drag::{OverlayCommit, OverlayDrag};
