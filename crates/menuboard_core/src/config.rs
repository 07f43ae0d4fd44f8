//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_PORT, DEFAULT_UPLOAD_DIR};
use crate::session::AdminIdentity;
use std::env;
use std::path::PathBuf;

/// Credentials and signing secret for the single admin operator.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub identity: AdminIdentity,
    pub session_secret: String,
}

/// Runtime configuration for Menuboard.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub upload_dir: String,
    pub max_upload_size: usize,
    /// `None` when any of `ADMIN_USER`, `ADMIN_PASS`, `SESSION_SECRET` is missing.
    pub auth: Option<AuthConfig>,
    pub secure_cookies: bool,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Resolve the admin identity and signing secret from the environment.
///
/// # Returns
/// `Some(AuthConfig)` only when all three variables are set and non-empty.
pub fn auth_from_env() -> Option<AuthConfig> {
    let username = non_empty_var("ADMIN_USER")?;
    let password = non_empty_var("ADMIN_PASS")?;
    let session_secret = non_empty_var("SESSION_SECRET")?;
    Some(AuthConfig {
        identity: AdminIdentity::new(username.trim(), password),
        session_secret,
    })
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let auth = auth_from_env();
        if auth.is_none() {
            tracing::warn!(
                "ADMIN_USER, ADMIN_PASS and SESSION_SECRET are not all set; login is disabled"
            );
        }
        Self {
            db_path: env::var("DB_PATH").map(expand_tilde).unwrap_or_else(|_| {
                let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                let cache_dir = home.join(".cache").join("menuboard");
                cache_dir.join("db").to_string_lossy().to_string()
            }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            upload_dir: env::var("UPLOAD_DIR")
                .map(expand_tilde)
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE),
            auth,
            secure_cookies: env_flag_enabled("COOKIE_SECURE"),
        }
    }
}
