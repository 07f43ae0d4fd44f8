//! Shared constants used across Menuboard crates.

/// Default API port for Menuboard.
pub const DEFAULT_PORT: u16 = 38471;

/// Default maximum upload size accepted by the API layer.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 8 * 1024 * 1024;

/// URL prefix under which uploaded images are addressable.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

/// Default on-disk directory for uploaded images.
pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";

/// Title assigned to freshly created menus.
pub const DEFAULT_MENU_TITLE: &str = "New Menu";

/// Cookie carrying the signed admin session token.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Session cookie lifetime in seconds (12 hours).
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 12;
