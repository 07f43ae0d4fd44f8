//! Root crate facade for the Menuboard server, core, and headless editor.

pub use menuboard_core::{
    config, constants, db, error, layout, models, session, uploads, AppError, Config, Database,
    DEFAULT_PORT,
};
pub use menuboard_server::{create_app, resolve_bind_address, serve_router, AppState};

/// HTTP layer: handlers, auth guards, and error mapping.
pub mod server {
    pub use menuboard_server::{auth, error, handlers};
}

/// Headless editing client.
pub mod editor {
    pub use menuboard_editor::*;
}
