//! Raster export of a laid-out menu.
//!
//! Text is not rasterized: each title and row is drawn as a solid rule whose
//! width tracks the label length.

use super::contrast::{tone_for_background, TextTone};
use super::layout::{layout_menu, MenuLayout, Rect, RowLayout, LINE_HEIGHT};
use chrono::{DateTime, Utc};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use menuboard_core::layout::{ImageField, OverlayTarget};
use menuboard_core::models::item::ItemType;
use menuboard_core::models::menu::Menu;
use menuboard_core::models::MenuWithItems;
use menuboard_core::uploads::UploadStore;
use std::io::Cursor;
use thiserror::Error;

/// Device pixels per layout pixel.
pub const PIXEL_RATIO: f32 = 2.0;
/// Approximate advance of one glyph relative to the font size.
const GLYPH_ADVANCE: f32 = 0.55;
/// Height of a text rule relative to the font size.
const RULE_HEIGHT: f32 = 0.6;
const SHADOW_ALPHA: f32 = 0.35;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Decoded images referenced by a menu, plus the text tone they imply.
#[derive(Debug, Clone)]
pub struct SnapshotAssets {
    pub background: Option<DynamicImage>,
    pub zelle: Option<DynamicImage>,
    pub contact: Option<DynamicImage>,
    pub tone: TextTone,
}

impl Default for SnapshotAssets {
    fn default() -> Self {
        Self {
            background: None,
            zelle: None,
            contact: None,
            tone: TextTone::Dark,
        }
    }
}

fn read_upload(uploads: &UploadStore, path: &str) -> Option<Vec<u8>> {
    let file = uploads.resolve(path)?;
    match std::fs::read(&file) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::warn!("cannot read upload {}: {}", file.display(), err);
            None
        }
    }
}

fn decode(bytes: Option<Vec<u8>>) -> Option<DynamicImage> {
    image::load_from_memory(&bytes?).ok()
}

impl SnapshotAssets {
    /// Load every image `menu` references from `uploads`.
    ///
    /// Missing or undecodable files are skipped; a background that cannot be
    /// read still selects light text.
    pub fn load(uploads: &UploadStore, menu: &Menu) -> Self {
        let load = |field: ImageField| {
            field
                .get(menu)
                .and_then(|path| read_upload(uploads, path))
        };

        let (background, tone) = match menu.background_image_path.as_deref() {
            None => (None, TextTone::Dark),
            Some(_) => {
                let bytes = load(ImageField::Background);
                let tone = tone_for_background(Some(bytes.as_deref().unwrap_or_default()));
                (decode(bytes), tone)
            }
        };

        Self {
            background,
            zelle: decode(load(ImageField::Zelle)),
            contact: decode(load(ImageField::Contact)),
            tone,
        }
    }

    fn overlay(&self, target: OverlayTarget) -> Option<&DynamicImage> {
        match target {
            OverlayTarget::Zelle => self.zelle.as_ref(),
            OverlayTarget::Contact => self.contact.as_ref(),
        }
    }
}

fn device(value: f32) -> i64 {
    (value * PIXEL_RATIO).round() as i64
}

fn blend(pixel: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    for (channel, target) in pixel.0.iter_mut().zip(rgb) {
        let mixed = f32::from(*channel) * (1.0 - alpha) + f32::from(target) * alpha;
        *channel = mixed.round() as u8;
    }
}

/// Blend a solid rectangle given in device pixels; out-of-canvas parts are clipped.
fn fill(canvas: &mut RgbaImage, x: i64, y: i64, width: i64, height: i64, rgb: [u8; 3], alpha: f32) {
    let x0 = x.clamp(0, i64::from(canvas.width()));
    let y0 = y.clamp(0, i64::from(canvas.height()));
    let x1 = (x + width).clamp(0, i64::from(canvas.width()));
    let y1 = (y + height).clamp(0, i64::from(canvas.height()));
    for py in y0..y1 {
        for px in x0..x1 {
            blend(canvas.get_pixel_mut(px as u32, py as u32), rgb, alpha);
        }
    }
}

/// Layout-pixel rectangle covered by a text rule for `label`.
fn text_rule(label: &str, font_size: f32, line: Rect, align_right: bool) -> Rect {
    let width = (label.chars().count() as f32 * font_size * GLYPH_ADVANCE).min(line.width);
    let height = font_size * RULE_HEIGHT;
    let x = if align_right {
        line.x + line.width - width
    } else {
        line.x
    };
    Rect {
        x,
        y: line.y + (font_size * LINE_HEIGHT - height) / 2.0,
        width,
        height,
    }
}

fn draw_rule(canvas: &mut RgbaImage, rule: Rect, tone: TextTone) {
    if tone.has_shadow() {
        fill(
            canvas,
            device(rule.x) + 1,
            device(rule.y) + 1,
            device(rule.width),
            device(rule.height),
            [0, 0, 0],
            SHADOW_ALPHA,
        );
    }
    fill(
        canvas,
        device(rule.x),
        device(rule.y),
        device(rule.width),
        device(rule.height),
        tone.rgb(),
        1.0,
    );
}

fn draw_row(canvas: &mut RgbaImage, row: &RowLayout, tone: TextTone) {
    let name_space = match (&row.kind, &row.price) {
        (ItemType::Item, Some(_)) => row.rect.width * 0.75,
        _ => row.rect.width,
    };
    let name_line = Rect {
        width: name_space,
        ..row.rect
    };
    draw_rule(canvas, text_rule(&row.name, row.font_size, name_line, false), tone);

    if let (ItemType::Item, Some(price)) = (&row.kind, &row.price) {
        let price_line = Rect {
            x: row.rect.x + name_space,
            width: row.rect.width - name_space,
            ..row.rect
        };
        draw_rule(canvas, text_rule(price, row.font_size, price_line, true), tone);
    }
}

/// Rasterize `layout` to an RGBA canvas at [`PIXEL_RATIO`].
pub fn rasterize(layout: &MenuLayout, assets: &SnapshotAssets) -> RgbaImage {
    let width = device(layout.canvas.width).max(1) as u32;
    let height = device(layout.canvas.height).max(1) as u32;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    if layout.background_image_path.is_some() {
        if let Some(background) = &assets.background {
            let cover = background
                .resize_to_fill(width, height, FilterType::Triangle)
                .to_rgba8();
            imageops::replace(&mut canvas, &cover, 0, 0);
        }
        if layout.overlay_alpha > 0.0 {
            fill(
                &mut canvas,
                0,
                0,
                i64::from(width),
                i64::from(height),
                [0, 0, 0],
                layout.overlay_alpha,
            );
        }
    }

    let title = &layout.title;
    let mut title_rule = text_rule(&title.text, title.font_size, title.rect, false);
    title_rule.x = title.rect.x + (title.rect.width - title_rule.width) / 2.0;
    draw_rule(&mut canvas, title_rule, layout.tone);

    for row in layout.columns.iter().flatten() {
        draw_row(&mut canvas, row, layout.tone);
    }

    for overlay in &layout.overlays {
        let Some(image) = assets.overlay(overlay.target) else {
            continue;
        };
        let target_width = device(overlay.rect.width).max(1) as u32;
        let target_height = ((u64::from(target_width) * u64::from(image.height()))
            / u64::from(image.width().max(1)))
        .max(1) as u32;
        let resized = image
            .resize_exact(target_width, target_height, FilterType::Triangle)
            .to_rgba8();
        imageops::overlay(
            &mut canvas,
            &resized,
            device(overlay.rect.x),
            device(overlay.rect.y),
        );
    }

    canvas
}

/// Lay out and export `state` as PNG bytes.
///
/// # Arguments
/// - `state`: Menu and its ordered items, as currently visible.
/// - `container_width`: Width available to the preview, in layout pixels.
/// - `assets`: Decoded images referenced by the menu.
///
/// # Errors
/// Returns [`RenderError::Image`] if PNG encoding fails.
pub fn render_png(
    state: &MenuWithItems,
    container_width: u32,
    assets: &SnapshotAssets,
) -> Result<Vec<u8>, RenderError> {
    let layout = layout_menu(&state.menu, &state.items, container_width, assets.tone);
    let canvas = rasterize(&layout, assets);
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Download name for an export, e.g. `menu-sunday-brunch-20261018-093000.png`.
pub fn snapshot_file_name(title: &str, at: DateTime<Utc>) -> String {
    let mut slug = String::new();
    for ch in super::layout::display_title(title).chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "menu" } else { slug };
    format!("menu-{}-{}.png", slug, at.format("%Y%m%d-%H%M%S"))
}
