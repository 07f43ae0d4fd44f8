//! Menu item storage operations backed by redb.
//!
//! Inserts, deletes and moves change positions and therefore go through
//! [`crate::db::TransactionOps`]. This accessor covers reads and in-place edits.

use super::deserialize_item;
use super::tables::{MENU_ITEMS, MENU_ITEMS_BY_POSITION};
use crate::error::AppError;
use crate::models::item::{MenuItem, UpdateItemRequest};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for item-related redb tables.
pub struct ItemDb {
    db: Arc<redb::Database>,
}

/// Load every item of `menu_id` ascending by position using the position index.
pub(crate) fn load_ordered<T, P>(
    items: &T,
    positions: &P,
    menu_id: &str,
) -> Result<Vec<MenuItem>, AppError>
where
    T: ReadableTable<&'static str, &'static [u8]>,
    P: ReadableTable<(&'static str, u32), &'static str>,
{
    let mut ordered = Vec::new();
    for entry in positions.range((menu_id, 0u32)..=(menu_id, u32::MAX))? {
        let (key, value) = entry?;
        let (_, position) = key.value();
        let item_id = value.value();
        let Some(row) = items.get(item_id)? else {
            return Err(AppError::StorageMessage(format!(
                "Position {} of menu '{}' references missing item '{}'",
                position, menu_id, item_id
            )));
        };
        ordered.push(deserialize_item(row.value())?);
    }
    Ok(ordered)
}

impl ItemDb {
    /// Initialize item tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(MENU_ITEMS)?;
        write_txn.open_table(MENU_ITEMS_BY_POSITION)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Fetch an item by id regardless of owning menu.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<MenuItem>, AppError> {
        let read_txn = self.db.begin_read()?;
        let items = read_txn.open_table(MENU_ITEMS)?;
        match items.get(id)? {
            Some(value) => Ok(Some(deserialize_item(value.value())?)),
            None => Ok(None),
        }
    }

    /// List the items of a menu ascending by position.
    ///
    /// # Returns
    /// The ordered items; empty for unknown menus.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list_for_menu(&self, menu_id: &str) -> Result<Vec<MenuItem>, AppError> {
        let read_txn = self.db.begin_read()?;
        let items = read_txn.open_table(MENU_ITEMS)?;
        let positions = read_txn.open_table(MENU_ITEMS_BY_POSITION)?;
        load_ordered(&items, &positions, menu_id)
    }

    /// Edit an item's name and/or price.
    ///
    /// # Arguments
    /// - `menu_id`: Menu the item must belong to.
    /// - `item_id`: Item to edit.
    /// - `update`: Sparse edit payload.
    ///
    /// # Returns
    /// The stored item after the edit.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the item is missing or owned by another
    /// menu, [`AppError::Validation`] when the result would be invalid, or a
    /// storage error.
    pub fn update(
        &self,
        menu_id: &str,
        item_id: &str,
        update: &UpdateItemRequest,
    ) -> Result<MenuItem, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut items = write_txn.open_table(MENU_ITEMS)?;

            let Some(old_guard) = items.get(item_id)? else {
                return Err(AppError::NotFound);
            };
            let mut item = deserialize_item(old_guard.value())?;
            drop(old_guard);

            if item.menu_id != menu_id {
                return Err(AppError::NotFound);
            }
            update.apply_to(&mut item)?;

            let encoded = bincode::serialize(&item)?;
            items.insert(item_id, encoded.as_slice())?;
            item
        };
        write_txn.commit()?;
        Ok(updated)
    }
}
