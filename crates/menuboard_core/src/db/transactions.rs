//! Position-affecting item mutations and menu deletion.
//!
//! Each operation runs under the per-menu guard and commits in a single redb
//! write transaction, so concurrent inserts never observe the same `max` and a
//! swap never lands half-applied.

use super::item::load_ordered;
use super::menu_lock::MenuTxnGuard;
use super::reorder::{next_position, swap_partner};
use super::tables::{MENUS, MENUS_BY_CREATED, MENU_ITEMS, MENU_ITEMS_BY_POSITION};
use super::{deserialize_item, deserialize_menu, reverse_timestamp_key, Database};
use crate::error::AppError;
use crate::models::item::{MenuItem, MoveDirection, NewItem};
use redb::ReadableTable;

/// Atomic operations that keep item positions consistent.
pub struct TransactionOps;

fn insert_at(
    items: &mut redb::Table<&str, &[u8]>,
    positions: &mut redb::Table<(&str, u32), &str>,
    item: &MenuItem,
) -> Result<(), AppError> {
    if positions
        .get((item.menu_id.as_str(), item.position))?
        .is_some()
    {
        return Err(AppError::StorageMessage(format!(
            "Position {} of menu '{}' is already taken",
            item.position, item.menu_id
        )));
    }
    let encoded = bincode::serialize(item)?;
    items.insert(item.id.as_str(), encoded.as_slice())?;
    positions.insert((item.menu_id.as_str(), item.position), item.id.as_str())?;
    Ok(())
}

impl TransactionOps {
    /// Acquire the critical section for `menu_id`.
    ///
    /// # Errors
    /// Returns an error when the lock table is poisoned.
    pub fn acquire_menu_guard<'a>(
        db: &'a Database,
        menu_id: &str,
    ) -> Result<MenuTxnGuard<'a>, AppError> {
        db.menu_locks.acquire(menu_id)
    }

    /// Append a validated item at `max(position) + 1` (or 0).
    ///
    /// # Returns
    /// The stored item including its assigned position.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the menu is missing, or a storage error.
    pub fn add_item(db: &Database, menu_id: &str, new_item: NewItem) -> Result<MenuItem, AppError> {
        let guard = Self::acquire_menu_guard(db, menu_id)?;
        Self::add_item_locked(db, &guard, new_item)
    }

    /// Append an item while holding the menu guard.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the menu is missing, or a storage error.
    pub fn add_item_locked(
        db: &Database,
        guard: &MenuTxnGuard<'_>,
        new_item: NewItem,
    ) -> Result<MenuItem, AppError> {
        let menu_id = guard.menu_id();
        let write_txn = db.db.begin_write()?;
        let item = {
            let menus = write_txn.open_table(MENUS)?;
            let mut items = write_txn.open_table(MENU_ITEMS)?;
            let mut positions = write_txn.open_table(MENU_ITEMS_BY_POSITION)?;

            if menus.get(menu_id)?.is_none() {
                return Err(AppError::NotFound);
            }

            let max_existing = positions
                .range((menu_id, 0u32)..=(menu_id, u32::MAX))?
                .next_back()
                .transpose()?
                .map(|(key, _)| key.value().1);
            let position = next_position(max_existing)?;

            let item = MenuItem::new(
                menu_id,
                new_item.item_type,
                new_item.name,
                new_item.price,
                position,
            );
            insert_at(&mut items, &mut positions, &item)?;
            item
        };
        write_txn.commit()?;
        tracing::debug!(
            "Added item {} to menu {} at position {}",
            item.id,
            menu_id,
            item.position
        );
        Ok(item)
    }

    /// Remove an item, leaving a gap in the positions.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the item is missing or belongs to
    /// another menu, or a storage error.
    pub fn delete_item(db: &Database, menu_id: &str, item_id: &str) -> Result<(), AppError> {
        let guard = Self::acquire_menu_guard(db, menu_id)?;
        Self::delete_item_locked(db, &guard, item_id)
    }

    /// Remove an item while holding the menu guard.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the item is missing or foreign.
    pub fn delete_item_locked(
        db: &Database,
        guard: &MenuTxnGuard<'_>,
        item_id: &str,
    ) -> Result<(), AppError> {
        let menu_id = guard.menu_id();
        let write_txn = db.db.begin_write()?;
        {
            let mut items = write_txn.open_table(MENU_ITEMS)?;
            let mut positions = write_txn.open_table(MENU_ITEMS_BY_POSITION)?;

            let Some(old_guard) = items.get(item_id)? else {
                return Err(AppError::NotFound);
            };
            let item = deserialize_item(old_guard.value())?;
            drop(old_guard);

            if item.menu_id != menu_id {
                return Err(AppError::NotFound);
            }

            let _ = positions.remove((menu_id, item.position))?;
            let _ = items.remove(item_id)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Swap an item with its neighbour in `direction`.
    ///
    /// # Returns
    /// The menu's full item list in its new order.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the item (or menu) is missing,
    /// [`AppError::InvalidMove`] at the list edge, or a storage error.
    pub fn move_item(
        db: &Database,
        menu_id: &str,
        item_id: &str,
        direction: MoveDirection,
    ) -> Result<Vec<MenuItem>, AppError> {
        let guard = Self::acquire_menu_guard(db, menu_id)?;
        Self::move_item_locked(db, &guard, item_id, direction)
    }

    /// Swap an item with its neighbour while holding the menu guard.
    ///
    /// # Errors
    /// See [`TransactionOps::move_item`].
    pub fn move_item_locked(
        db: &Database,
        guard: &MenuTxnGuard<'_>,
        item_id: &str,
        direction: MoveDirection,
    ) -> Result<Vec<MenuItem>, AppError> {
        let menu_id = guard.menu_id();
        let write_txn = db.db.begin_write()?;
        let reordered = {
            let mut items = write_txn.open_table(MENU_ITEMS)?;
            let mut positions = write_txn.open_table(MENU_ITEMS_BY_POSITION)?;

            let mut ordered = load_ordered(&items, &positions, menu_id)?;
            let index = ordered
                .iter()
                .position(|item| item.id == item_id)
                .ok_or(AppError::NotFound)?;
            let partner = swap_partner(ordered.len(), index, direction)?;

            let moving_position = ordered[index].position;
            let partner_position = ordered[partner].position;
            ordered[index].position = partner_position;
            ordered[partner].position = moving_position;

            for item in [&ordered[index], &ordered[partner]] {
                let encoded = bincode::serialize(item)?;
                items.insert(item.id.as_str(), encoded.as_slice())?;
                positions.insert((menu_id, item.position), item.id.as_str())?;
            }

            ordered.swap(index, partner);
            ordered
        };
        write_txn.commit()?;
        Ok(reordered)
    }

    /// Delete a menu together with all of its items.
    ///
    /// # Returns
    /// `Ok(true)` when the menu existed, `Ok(false)` otherwise.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn delete_menu(db: &Database, menu_id: &str) -> Result<bool, AppError> {
        let _guard = Self::acquire_menu_guard(db, menu_id)?;
        let write_txn = db.db.begin_write()?;
        let removed_items = {
            let mut menus = write_txn.open_table(MENUS)?;
            let mut by_created = write_txn.open_table(MENUS_BY_CREATED)?;
            let mut items = write_txn.open_table(MENU_ITEMS)?;
            let mut positions = write_txn.open_table(MENU_ITEMS_BY_POSITION)?;

            let Some(old_guard) = menus.get(menu_id)? else {
                return Ok(false);
            };
            let menu = deserialize_menu(old_guard.value())?;
            drop(old_guard);

            let ordered = load_ordered(&items, &positions, menu_id)?;
            for item in &ordered {
                let _ = positions.remove((menu_id, item.position))?;
                let _ = items.remove(item.id.as_str())?;
            }
            let _ = by_created.remove((reverse_timestamp_key(menu.created_at), menu_id))?;
            let _ = menus.remove(menu_id)?;
            ordered.len()
        };
        write_txn.commit()?;
        tracing::info!("Deleted menu {} with {} items", menu_id, removed_items);
        Ok(true)
    }
}
