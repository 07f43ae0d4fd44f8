//! Per-menu critical sections for position-affecting item mutations.

use crate::error::AppError;
use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard};

/// Keyed lock table: at most one holder per menu id, entries created on demand.
#[derive(Default)]
pub struct MenuLockTable {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

/// Proof that the caller holds the critical section for one menu.
///
/// Dropping the guard releases the menu and wakes waiters.
pub struct MenuTxnGuard<'a> {
    table: &'a MenuLockTable,
    menu_id: String,
}

impl MenuTxnGuard<'_> {
    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }
}

impl Drop for MenuTxnGuard<'_> {
    fn drop(&mut self) {
        match self.table.held.lock() {
            Ok(mut held) => {
                held.remove(&self.menu_id);
            }
            Err(poisoned) => {
                tracing::error!(
                    "Menu lock table poisoned while releasing menu {}",
                    self.menu_id
                );
                poisoned.into_inner().remove(&self.menu_id);
            }
        }
        self.table.released.notify_all();
    }
}

impl MenuLockTable {
    fn state(&self) -> Result<MutexGuard<'_, HashSet<String>>, AppError> {
        self.held
            .lock()
            .map_err(|_| AppError::StorageMessage("Menu lock table poisoned".to_string()))
    }

    /// Block until `menu_id` is free, then take it.
    ///
    /// # Returns
    /// A guard that must be held for the full insert/delete/move critical section.
    ///
    /// # Errors
    /// Returns an error when the lock table is poisoned.
    pub fn acquire(&self, menu_id: &str) -> Result<MenuTxnGuard<'_>, AppError> {
        let mut held = self.state()?;
        while held.contains(menu_id) {
            held = self
                .released
                .wait(held)
                .map_err(|_| AppError::StorageMessage("Menu lock table poisoned".to_string()))?;
        }
        held.insert(menu_id.to_string());
        Ok(MenuTxnGuard {
            table: self,
            menu_id: menu_id.to_string(),
        })
    }

    /// Whether `menu_id` is currently inside a critical section.
    pub fn is_held(&self, menu_id: &str) -> bool {
        self.state()
            .map(|held| held.contains(menu_id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::MenuLockTable;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn guard_releases_on_drop() {
        let table = MenuLockTable::default();
        {
            let guard = table.acquire("menu-a").expect("acquire");
            assert_eq!(guard.menu_id(), "menu-a");
            assert!(table.is_held("menu-a"));
            assert!(!table.is_held("menu-b"));
        }
        assert!(!table.is_held("menu-a"));
    }

    #[test]
    fn different_menus_do_not_block_each_other() {
        let table = MenuLockTable::default();
        let _a = table.acquire("menu-a").expect("acquire a");
        let _b = table.acquire("menu-b").expect("acquire b");
        assert!(table.is_held("menu-a") && table.is_held("menu-b"));
    }

    #[test]
    fn same_menu_sections_never_overlap() {
        let table = Arc::new(MenuLockTable::default());
        let inside = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = table.clone();
                let inside = inside.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..50 {
                        let _guard = table.acquire("shared").expect("acquire");
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("join");
        }
        assert!(!table.is_held("shared"));
    }
}
