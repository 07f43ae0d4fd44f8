//! Shared test-only helpers for menuboard_core.

use crate::db::TransactionOps;
use crate::models::item::{CreateItemRequest, MenuItem};
use crate::models::menu::Menu;
use crate::Database;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Persist a fresh default menu.
pub(crate) fn create_menu(db: &Database) -> Menu {
    let menu = Menu::new();
    db.menus.create(&menu).expect("create menu");
    menu
}

/// Append a priced item named `name`.
pub(crate) fn add_priced_item(db: &Database, menu_id: &str, name: &str) -> MenuItem {
    let request = CreateItemRequest {
        item_type: None,
        name: Some(name.to_string()),
        price: Some("10".to_string()),
    };
    TransactionOps::add_item(db, menu_id, request.validate().expect("valid item"))
        .expect("add item")
}

/// Asserts that positions within the menu are strictly increasing and that the
/// position index agrees with the item rows.
///
/// # Panics
/// Panics when the stored order is inconsistent.
pub(crate) fn assert_positions_consistent(db: &Database, menu_id: &str) {
    let items = db.items.list_for_menu(menu_id).expect("list items");
    for pair in items.windows(2) {
        assert!(
            pair[0].position < pair[1].position,
            "positions out of order: {} then {}",
            pair[0].position,
            pair[1].position
        );
    }
    for item in &items {
        let stored = db.items.get(&item.id).expect("get").expect("row exists");
        assert_eq!(stored.position, item.position, "row/index drift for {}", item.id);
        assert_eq!(stored.menu_id, menu_id);
    }
}
