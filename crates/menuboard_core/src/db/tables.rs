//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical menu rows (`Menu`, bincode-encoded).
pub const MENUS: TableDefinition<&str, &[u8]> = TableDefinition::new("menus");
/// Creation-order index keyed by reverse-millis then id (newest first).
pub const MENUS_BY_CREATED: TableDefinition<(u64, &str), ()> =
    TableDefinition::new("menus_by_created");

/// Canonical item rows (`MenuItem`, bincode-encoded).
pub const MENU_ITEMS: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_items");
/// Display-order index `(menu_id, position) -> item_id`.
///
/// One key per position makes duplicate positions within a menu unrepresentable.
pub const MENU_ITEMS_BY_POSITION: TableDefinition<(&str, u32), &str> =
    TableDefinition::new("menu_items_by_position");
