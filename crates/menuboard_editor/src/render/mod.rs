//! Menu preview geometry, contrast selection, and PNG export.

pub mod contrast;
pub mod layout;
pub mod snapshot;

pub use contrast::{overlay_alpha, tone_for_background, TextTone};
pub use layout::{display_title, layout_menu, split_columns, MenuLayout, RowLayout};
pub use snapshot::{render_png, snapshot_file_name, RenderError, SnapshotAssets};
