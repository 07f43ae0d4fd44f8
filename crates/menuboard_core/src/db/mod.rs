//! Database layer and transactional helpers for Menuboard.

/// Item storage helpers.
pub mod item;
/// Menu storage helpers.
pub mod menu;
/// Per-menu critical sections.
pub mod menu_lock;
/// Position arithmetic for ordered rows.
pub mod reorder;
/// redb table definitions.
pub mod tables;
/// Position-affecting cross-table operations.
pub mod transactions;

use crate::error::AppError;
use crate::layout::MenuPatch;
use crate::models::item::MenuItem;
use crate::models::menu::Menu;
use crate::models::MenuWithItems;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

pub use menu_lock::{MenuLockTable, MenuTxnGuard};
pub use transactions::TransactionOps;

#[cfg(test)]
mod tests;

pub(crate) fn reverse_timestamp_key(at: DateTime<Utc>) -> u64 {
    // Pre-epoch timestamps clamp to zero to avoid negative->u64 underflow.
    let millis = at.timestamp_millis().max(0) as u64;
    u64::MAX.saturating_sub(millis)
}

pub(crate) fn deserialize_menu(bytes: &[u8]) -> Result<Menu, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

pub(crate) fn deserialize_item(bytes: &[u8]) -> Result<MenuItem, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Database handle with access to typed table accessors.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub menus: menu::MenuDb,
    pub items: item::ItemDb,
    menu_locks: Arc<MenuLockTable>,
}

impl Database {
    fn from_shared(db: Arc<redb::Database>, menu_locks: Arc<MenuLockTable>) -> Result<Self, AppError> {
        Ok(Self {
            menus: menu::MenuDb::new(db.clone())?,
            items: item::ItemDb::new(db.clone())?,
            db,
            menu_locks,
        })
    }

    /// Open (or create) the database stored under `path`.
    ///
    /// `path` is a directory; the redb file lives at `<path>/data.redb`.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb cannot open
    /// the file (for example when another process holds it).
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir)?;
        let file = dir.join(tables::REDB_FILE_NAME);
        let db = redb::Database::create(&file).map_err(|err| {
            tracing::error!("Failed to open database at {}: {}", file.display(), err);
            AppError::from(err)
        })?;
        tracing::info!("Opened database at {}", file.display());
        Self::from_shared(Arc::new(db), Arc::new(MenuLockTable::default()))
    }

    /// Create another handle over the same storage and lock table.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn share(&self) -> Result<Self, AppError> {
        Self::from_shared(self.db.clone(), self.menu_locks.clone())
    }

    /// Load a menu and its ordered items from one read snapshot.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the menu is missing, or a storage error.
    pub fn menu_with_items(&self, menu_id: &str) -> Result<MenuWithItems, AppError> {
        use redb::{ReadableDatabase, ReadableTable};

        let read_txn = self.db.begin_read()?;
        let menus = read_txn.open_table(tables::MENUS)?;
        let items = read_txn.open_table(tables::MENU_ITEMS)?;
        let positions = read_txn.open_table(tables::MENU_ITEMS_BY_POSITION)?;

        let Some(row) = menus.get(menu_id)? else {
            return Err(AppError::NotFound);
        };
        let menu = deserialize_menu(row.value())?;
        let items = item::load_ordered(&items, &positions, menu_id)?;
        Ok(MenuWithItems { menu, items })
    }

    /// Validate a sparse patch and apply it atomically.
    ///
    /// # Returns
    /// The updated menu.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] before any write when a field is invalid,
    /// [`AppError::NotFound`] when the menu is missing, or a storage error.
    pub fn update_menu(&self, menu_id: &str, patch: &MenuPatch) -> Result<Menu, AppError> {
        let validated = patch.validate()?;
        self.menus
            .update(menu_id, &validated)?
            .ok_or(AppError::NotFound)
    }

    /// List a menu's items, failing when the menu itself is unknown.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the menu is missing, or a storage error.
    pub fn items_for_menu(&self, menu_id: &str) -> Result<Vec<MenuItem>, AppError> {
        Ok(self.menu_with_items(menu_id)?.items)
    }
}
