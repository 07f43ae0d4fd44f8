//! Core domain library for Menuboard (config, storage, models, validation).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across Menuboard crates.
pub mod constants;
/// Database access layer, reorder engine, and transactions.
pub mod db;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Sparse menu updates and layout parameter bounds.
pub mod layout;
/// Data models for API requests and persistence.
pub mod models;
/// Signed admin session tokens.
pub mod session;
/// Uploaded image storage.
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_PORT, UPLOAD_URL_PREFIX};
pub use db::Database;
pub use error::AppError;
