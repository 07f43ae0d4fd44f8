//! Menu records and appearance defaults.

use crate::constants::DEFAULT_MENU_TITLE;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Publication state of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MenuStatus {
    Draft,
    Published,
}

impl MenuStatus {
    /// Wire representation (`DRAFT` / `PUBLISHED`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for MenuStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuStatus {
    type Err = AppError;

    /// Accepts exactly `DRAFT` or `PUBLISHED`; matching is case-sensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DRAFT" => Ok(Self::Draft),
            "PUBLISHED" => Ok(Self::Published),
            _ => Err(AppError::validation("Invalid status value.")),
        }
    }
}

pub const DEFAULT_TITLE_FONT_SIZE: u32 = 44;
pub const DEFAULT_ITEM_FONT_SIZE: u32 = 18;
pub const DEFAULT_CONTENT_TOP_OFFSET: u32 = 72;
pub const DEFAULT_CONTENT_WIDTH: u32 = 620;
pub const DEFAULT_OVERLAY_OPACITY: u32 = 35;
pub const DEFAULT_OVERLAY_WIDTH: u32 = 120;
pub const DEFAULT_ZELLE_POSITION: (u32, u32) = (24, 24);
pub const DEFAULT_CONTACT_POSITION: (u32, u32) = (536, 24);

/// Persisted menu document with its appearance parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    pub title: String,
    pub status: MenuStatus,
    pub background_image_path: Option<String>,
    pub title_font_size: u32,
    pub item_font_size: u32,
    pub content_top_offset: u32,
    pub content_width: u32,
    pub overlay_opacity: u32,
    pub zelle_image_path: Option<String>,
    pub zelle_x: u32,
    pub zelle_y: u32,
    pub zelle_width: u32,
    pub contact_image_path: Option<String>,
    pub contact_x: u32,
    pub contact_y: u32,
    pub contact_width: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    /// Create a draft menu titled "New Menu" with default appearance.
    pub fn new() -> Self {
        Self::with_title(DEFAULT_MENU_TITLE)
    }

    /// Create a draft menu with the given title and default appearance.
    pub fn with_title(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            status: MenuStatus::Draft,
            background_image_path: None,
            title_font_size: DEFAULT_TITLE_FONT_SIZE,
            item_font_size: DEFAULT_ITEM_FONT_SIZE,
            content_top_offset: DEFAULT_CONTENT_TOP_OFFSET,
            content_width: DEFAULT_CONTENT_WIDTH,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            zelle_image_path: None,
            zelle_x: DEFAULT_ZELLE_POSITION.0,
            zelle_y: DEFAULT_ZELLE_POSITION.1,
            zelle_width: DEFAULT_OVERLAY_WIDTH,
            contact_image_path: None,
            contact_x: DEFAULT_CONTACT_POSITION.0,
            contact_y: DEFAULT_CONTACT_POSITION.1,
            contact_width: DEFAULT_OVERLAY_WIDTH,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}
