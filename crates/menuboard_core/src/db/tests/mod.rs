//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::layout::{overlay_position_patch, LayoutField, MenuPatch, OverlayTarget};
use crate::models::item::{CreateItemRequest, ItemType, MoveDirection, UpdateItemRequest};
use crate::models::menu::{Menu, MenuStatus};
use crate::test_support::{
    add_priced_item, assert_positions_consistent, create_menu, setup_temp_db,
};
use std::sync::{Arc, Barrier};
use std::thread;

fn names(items: &[MenuItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

mod ordering;
