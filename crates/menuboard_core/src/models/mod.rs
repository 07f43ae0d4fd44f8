//! Data models for persistence and the HTTP API.

/// Menu line entries (items and category headers).
pub mod item;
/// Menu records and appearance defaults.
pub mod menu;


use serde::{Deserialize, Serialize};

/// A menu together with its items in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuWithItems {
    pub menu: menu::Menu,
    pub items: Vec<item::MenuItem>,
}
