//! Menu line entries: priced items and category headers.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Kind of a menu row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    #[default]
    Item,
    Category,
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ITEM" => Ok(Self::Item),
            "CATEGORY" => Ok(Self::Category),
            other => Err(AppError::validation(format!(
                "Invalid item type '{}'; expected ITEM or CATEGORY.",
                other
            ))),
        }
    }
}

/// One ordered row of a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub menu_id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    /// Always `Some` for [`ItemType::Item`], always `None` for [`ItemType::Category`].
    pub price: Option<String>,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl MenuItem {
    /// Build a row from already-validated fields.
    pub(crate) fn new(
        menu_id: &str,
        item_type: ItemType,
        name: String,
        price: Option<String>,
        position: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            menu_id: menu_id.to_string(),
            item_type,
            name,
            price,
            position,
            created_at: Utc::now(),
        }
    }

    pub fn is_category(&self) -> bool {
        self.item_type == ItemType::Category
    }
}

/// Request payload for adding a row to a menu.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateItemRequest {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
}

/// Request payload for editing a row's name and/or price.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub price: Option<String>,
}

/// Direction of a single-slot move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl FromStr for MoveDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(AppError::validation("itemId and direction are required.")),
        }
    }
}

/// Request payload for `PATCH /menus/{id}/items/reorder`.
///
/// Fields stay optional so malformed bodies surface as validation errors.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub item_id: Option<String>,
    pub direction: Option<String>,
}

impl ReorderRequest {
    /// Resolve into an item id and direction.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] when either field is missing or invalid.
    pub fn resolve(&self) -> Result<(String, MoveDirection), AppError> {
        let item_id = self
            .item_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::validation("itemId and direction are required."))?;
        let direction = self
            .direction
            .as_deref()
            .ok_or_else(|| AppError::validation("itemId and direction are required."))?
            .parse()?;
        Ok((item_id.to_string(), direction))
    }
}

fn trimmed_non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Fields for a new row after validation; position is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub item_type: ItemType,
    pub name: String,
    pub price: Option<String>,
}

impl CreateItemRequest {
    /// Validate and normalize a create request.
    ///
    /// Names and prices are trimmed; categories never carry a price.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] for a missing name, an unknown type, or a
    /// missing price on an `ITEM` row.
    pub fn validate(&self) -> Result<NewItem, AppError> {
        let item_type = match self.item_type.as_deref() {
            None => ItemType::Item,
            Some(raw) => raw.trim().parse()?,
        };
        let name = trimmed_non_empty(self.name.as_deref())
            .ok_or_else(|| AppError::validation("Name is required."))?;
        let price = match item_type {
            ItemType::Category => None,
            ItemType::Item => Some(
                trimmed_non_empty(self.price.as_deref())
                    .ok_or_else(|| AppError::validation("price required for item type"))?,
            ),
        };
        Ok(NewItem {
            item_type,
            name,
            price,
        })
    }
}

impl UpdateItemRequest {
    /// Apply this edit to `item` in place after validating the result.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] when the name is blank or an `ITEM` row
    /// would end up without a price. `item` is left untouched on error.
    pub fn apply_to(&self, item: &mut MenuItem) -> Result<(), AppError> {
        let name = match self.name.as_deref() {
            Some(raw) => Some(
                trimmed_non_empty(Some(raw))
                    .ok_or_else(|| AppError::validation("Name is required."))?,
            ),
            None => None,
        };
        let price = match item.item_type {
            ItemType::Category => None,
            ItemType::Item => {
                let candidate = match self.price.as_deref() {
                    Some(raw) => trimmed_non_empty(Some(raw)),
                    None => trimmed_non_empty(item.price.as_deref()),
                };
                Some(candidate.ok_or_else(|| AppError::validation("price required for item type"))?)
            }
        };

        if let Some(name) = name {
            item.name = name;
        }
        item.price = price;
        Ok(())
    }
}
