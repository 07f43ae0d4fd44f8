//! Two-column menu geometry.
//!
//! All coordinates are CSS pixels relative to the canvas origin; the snapshot
//! exporter multiplies them by its pixel ratio.

use super::contrast::{overlay_alpha, TextTone};
use menuboard_core::constants::DEFAULT_MENU_TITLE;
use menuboard_core::layout::OverlayTarget;
use menuboard_core::models::item::{ItemType, MenuItem};
use menuboard_core::models::menu::Menu;

pub const MAX_CANVAS_WIDTH: f32 = 680.0;
/// Canvas height over width (8:11 portrait).
pub const CANVAS_ASPECT: f32 = 11.0 / 8.0;
pub const PADDING_RATIO: f32 = 0.07;
pub const COLUMN_GAP_RATIO: f32 = 0.04;
pub const LINE_HEIGHT: f32 = 1.625;
pub const ROW_SPACING: f32 = 20.0;
pub const CATEGORY_SCALE: f32 = 1.08;
/// Space between the title baseline block and the first row.
pub const TITLE_SPACING: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleLayout {
    pub text: String,
    pub font_size: f32,
    pub rect: Rect,
}

/// One positioned row of the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub item_id: String,
    pub kind: ItemType,
    pub name: String,
    pub price: Option<String>,
    pub font_size: f32,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub target: OverlayTarget,
    pub image_path: String,
    pub rect: Rect,
}

/// Everything needed to draw a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    pub canvas: Rect,
    pub content: Rect,
    pub title: TitleLayout,
    pub columns: [Vec<RowLayout>; 2],
    pub tone: TextTone,
    /// Dim applied over the background; 0 without a background.
    pub overlay_alpha: f32,
    pub background_image_path: Option<String>,
    pub overlays: Vec<OverlayLayout>,
}

/// Title as displayed: trimmed, or "New Menu" when blank.
pub fn display_title(title: &str) -> &str {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        DEFAULT_MENU_TITLE
    } else {
        trimmed
    }
}

/// Split items into left and right columns; the left takes `ceil(n/2)`.
pub fn split_columns(items: &[MenuItem]) -> (&[MenuItem], &[MenuItem]) {
    items.split_at(items.len().div_ceil(2))
}

/// Vertical distance a row occupies at `font_size`.
pub fn row_pitch(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT + ROW_SPACING
}

fn row_font_size(kind: ItemType, item_font_size: f32) -> f32 {
    match kind {
        ItemType::Category => item_font_size * CATEGORY_SCALE,
        ItemType::Item => item_font_size,
    }
}

fn layout_column(items: &[MenuItem], x: f32, top: f32, width: f32, font: f32) -> Vec<RowLayout> {
    let mut y = top;
    items
        .iter()
        .map(|item| {
            let font_size = row_font_size(item.item_type, font);
            let height = row_pitch(font_size);
            let row = RowLayout {
                item_id: item.id.clone(),
                kind: item.item_type,
                name: item.name.clone(),
                price: item.price.clone(),
                font_size,
                rect: Rect {
                    x,
                    y,
                    width,
                    height,
                },
            };
            y += height;
            row
        })
        .collect()
}

fn overlay(menu: &Menu, target: OverlayTarget) -> Option<OverlayLayout> {
    let image_path = target.image_field().get(menu)?.to_string();
    let (x_field, y_field) = target.position_fields();
    let width = target.width_field().get(menu) as f32;
    Some(OverlayLayout {
        target,
        image_path,
        rect: Rect {
            x: x_field.get(menu) as f32,
            y: y_field.get(menu) as f32,
            width,
            height: width,
        },
    })
}

/// Lay out `menu` and its ordered `items` inside a container `container_width` wide.
///
/// # Arguments
/// - `tone`: Text tone chosen from the background (see [`super::contrast`]).
pub fn layout_menu(
    menu: &Menu,
    items: &[MenuItem],
    container_width: u32,
    tone: TextTone,
) -> MenuLayout {
    let canvas_width = (container_width as f32).min(MAX_CANVAS_WIDTH);
    let canvas = Rect {
        x: 0.0,
        y: 0.0,
        width: canvas_width,
        height: canvas_width * CANVAS_ASPECT,
    };

    let content_width = canvas_width.min(menu.content_width as f32);
    let content_x = (canvas_width - content_width) / 2.0;
    let content_top = menu.content_top_offset as f32;
    let padding = content_width * PADDING_RATIO;
    let gap = content_width * COLUMN_GAP_RATIO;
    let inner_width = (content_width - 2.0 * padding).max(0.0);
    let column_width = ((inner_width - gap) / 2.0).max(0.0);

    let title_font = menu.title_font_size as f32;
    let title_height = title_font * LINE_HEIGHT;
    let title = TitleLayout {
        text: display_title(&menu.title).to_string(),
        font_size: title_font,
        rect: Rect {
            x: content_x + padding,
            y: content_top,
            width: inner_width,
            height: title_height,
        },
    };

    let rows_top = content_top + title_height + TITLE_SPACING;
    let item_font = menu.item_font_size as f32;
    let (left, right) = split_columns(items);
    let left_x = content_x + padding;
    let right_x = left_x + column_width + gap;
    let columns = [
        layout_column(left, left_x, rows_top, column_width, item_font),
        layout_column(right, right_x, rows_top, column_width, item_font),
    ];

    let content_bottom = columns
        .iter()
        .filter_map(|column| column.last())
        .map(|row| row.rect.y + row.rect.height)
        .fold(rows_top, f32::max);

    let has_background = menu.background_image_path.is_some();
    MenuLayout {
        canvas,
        content: Rect {
            x: content_x,
            y: content_top,
            width: content_width,
            height: content_bottom - content_top,
        },
        title,
        columns,
        tone,
        overlay_alpha: overlay_alpha(has_background, menu.overlay_opacity),
        background_image_path: menu.background_image_path.clone(),
        overlays: [OverlayTarget::Zelle, OverlayTarget::Contact]
            .into_iter()
            .filter_map(|target| overlay(menu, target))
            .collect(),
    }
}
