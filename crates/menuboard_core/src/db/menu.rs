//! Menu storage operations backed by redb.

use super::tables::{MENUS, MENUS_BY_CREATED};
use super::{deserialize_menu, reverse_timestamp_key};
use crate::error::AppError;
use crate::layout::ValidatedMenuPatch;
use crate::models::menu::Menu;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for menu-related redb tables.
pub struct MenuDb {
    db: Arc<redb::Database>,
}

impl MenuDb {
    /// Initialize menu tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(MENUS)?;
        write_txn.open_table(MENUS_BY_CREATED)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new menu row and its creation index entry.
    ///
    /// # Errors
    /// Returns an error when the id already exists, or when serialization or
    /// storage fails.
    pub fn create(&self, menu: &Menu) -> Result<(), AppError> {
        let encoded = bincode::serialize(menu)?;
        let created_key = reverse_timestamp_key(menu.created_at);

        let write_txn = self.db.begin_write()?;
        {
            let mut menus = write_txn.open_table(MENUS)?;
            let mut by_created = write_txn.open_table(MENUS_BY_CREATED)?;

            if menus.get(menu.id.as_str())?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Menu id '{}' already exists",
                    menu.id
                )));
            }

            menus.insert(menu.id.as_str(), encoded.as_slice())?;
            by_created.insert((created_key, menu.id.as_str()), ())?;
        }
        write_txn.commit()?;
        tracing::info!("Created menu {}", menu.id);
        Ok(())
    }

    /// Fetch a menu by id.
    ///
    /// # Returns
    /// `Ok(Some(menu))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Menu>, AppError> {
        let read_txn = self.db.begin_read()?;
        let menus = read_txn.open_table(MENUS)?;
        match menus.get(id)? {
            Some(value) => Ok(Some(deserialize_menu(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all menus, newest first.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<Menu>, AppError> {
        let read_txn = self.db.begin_read()?;
        let menus = read_txn.open_table(MENUS)?;
        let by_created = read_txn.open_table(MENUS_BY_CREATED)?;

        let mut result = Vec::new();
        for entry in by_created.iter()? {
            let (key, _) = entry?;
            let (_, id) = key.value();
            match menus.get(id)? {
                Some(value) => result.push(deserialize_menu(value.value())?),
                None => tracing::warn!("Creation index references missing menu {}", id),
            }
        }
        Ok(result)
    }

    /// Apply a validated sparse patch in one write transaction.
    ///
    /// # Returns
    /// `Ok(Some(menu))` with the stored result, `Ok(None)` when the menu is missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update(&self, id: &str, patch: &ValidatedMenuPatch) -> Result<Option<Menu>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut menus = write_txn.open_table(MENUS)?;

            let Some(old_guard) = menus.get(id)? else {
                return Ok(None);
            };
            let mut menu = deserialize_menu(old_guard.value())?;
            drop(old_guard);

            patch.apply_to(&mut menu);
            let encoded = bincode::serialize(&menu)?;
            menus.insert(id, encoded.as_slice())?;
            menu
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }
}
