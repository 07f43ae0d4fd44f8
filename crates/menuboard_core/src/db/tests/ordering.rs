//! Reorder engine tests.

use super::*;

#[test]
fn test_scenario_move_third_item_up() {
    let (db, _temp) = setup_temp_db();
    let menu = create_menu(&db);
    let a = add_priced_item(&db, &menu.id, "A");
    let b = add_priced_item(&db, &menu.id, "B");
    let c = add_priced_item(&db, &menu.id, "C");

    let reordered = TransactionOps::move_item(&db, &menu.id, &c.id, MoveDirection::Up).unwrap();
    assert_eq!(names(&reordered), vec!["A", "C", "B"]);

    let position_of = |id: &str| db.items.get(id).unwrap().unwrap().position;
    assert_eq!(position_of(&a.id), 0);
    assert_eq!(position_of(&b.id), 2);
    assert_eq!(position_of(&c.id), 1);

    assert_eq!(db.items.list_for_menu(&menu.id).unwrap(), reordered);
    assert_positions_consistent(&db, &menu.id);
}

#[test]
fn test_moving_past_either_edge_is_rejected() {
    let (db, _temp) = setup_temp_db();
    let menu = create_menu(&db);
    let first = add_priced_item(&db, &menu.id, "First");
    add_priced_item(&db, &menu.id, "Middle");
    let last = add_priced_item(&db, &menu.id, "Last");
    let before = db.items.list_for_menu(&menu.id).unwrap();

    assert!(matches!(
        TransactionOps::move_item(&db, &menu.id, &first.id, MoveDirection::Up),
        Err(AppError::InvalidMove(_))
    ));
    assert!(matches!(
        TransactionOps::move_item(&db, &menu.id, &last.id, MoveDirection::Down),
        Err(AppError::InvalidMove(_))
    ));
    assert_eq!(db.items.list_for_menu(&menu.id).unwrap(), before);
}

#[test]
fn test_interior_move_swaps_exactly_two_positions() {
    let (db, _temp) = setup_temp_db();
    let menu = create_menu(&db);
    for name in ["A", "B", "C", "D", "E"] {
        add_priced_item(&db, &menu.id, name);
    }
    let before = db.items.list_for_menu(&menu.id).unwrap();
    let moving = before[1].clone();

    let after = TransactionOps::move_item(&db, &menu.id, &moving.id, MoveDirection::Down).unwrap();
    assert_eq!(names(&after), vec!["A", "C", "B", "D", "E"]);

    let changed: Vec<&str> = before
        .iter()
        .filter(|old| {
            let new = after.iter().find(|item| item.id == old.id).unwrap();
            new.position != old.position
        })
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(changed, vec!["B", "C"]);
}

#[test]
fn test_move_across_gap_swaps_sparse_positions() {
    let (db, _temp) = setup_temp_db();
    let menu = create_menu(&db);
    let a = add_priced_item(&db, &menu.id, "A");
    let b = add_priced_item(&db, &menu.id, "B");
    let c = add_priced_item(&db, &menu.id, "C");
    TransactionOps::delete_item(&db, &menu.id, &b.id).unwrap();

    let after = TransactionOps::move_item(&db, &menu.id, &a.id, MoveDirection::Down).unwrap();
    assert_eq!(names(&after), vec!["C", "A"]);
    assert_eq!(after[0].position, 0);
    assert_eq!(after[1].position, 2);
    assert_eq!(db.items.get(&c.id).unwrap().unwrap().position, 0);
    assert_positions_consistent(&db, &menu.id);
}

#[test]
fn test_move_unknown_or_foreign_item_is_not_found() {
    let (db, _temp) = setup_temp_db();
    let menu = create_menu(&db);
    let other = create_menu(&db);
    add_priced_item(&db, &menu.id, "A");
    let foreign = add_priced_item(&db, &other.id, "X");

    assert!(matches!(
        TransactionOps::move_item(&db, &menu.id, "missing", MoveDirection::Up),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        TransactionOps::move_item(&db, &menu.id, &foreign.id, MoveDirection::Up),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        TransactionOps::move_item(&db, "missing-menu", &foreign.id, MoveDirection::Down),
        Err(AppError::NotFound)
    ));
}

#[test]
fn test_mixed_categories_and_items_keep_relative_order() {
    let (db, _temp) = setup_temp_db();
    let menu = create_menu(&db);
    let header = CreateItemRequest {
        item_type: Some("CATEGORY".to_string()),
        name: Some("Mains".to_string()),
        price: None,
    };
    TransactionOps::add_item(&db, &menu.id, header.validate().unwrap()).unwrap();
    let steak = add_priced_item(&db, &menu.id, "Steak");
    add_priced_item(&db, &menu.id, "Fish");

    TransactionOps::move_item(&db, &menu.id, &steak.id, MoveDirection::Up).unwrap();
    let after = db.items.list_for_menu(&menu.id).unwrap();
    assert_eq!(names(&after), vec!["Steak", "Mains", "Fish"]);
    assert!(after[1].is_category());
}
