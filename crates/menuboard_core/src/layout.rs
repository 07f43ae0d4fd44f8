//! Sparse menu updates: validation of layout parameters and atomic application.
//!
//! A [`MenuPatch`] names only the fields a control changed. Every supplied field
//! is validated up front; a single violation rejects the whole patch so nothing
//! is written.

use crate::constants::UPLOAD_URL_PREFIX;
use crate::error::AppError;
use crate::models::menu::{Menu, MenuStatus};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::RangeInclusive;

/// Distinguish an explicit `null` from an absent key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial update of a menu as received from the editor.
///
/// Numeric fields are signed so out-of-range negatives surface as
/// [`AppError::Validation`] instead of a body decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_image_path: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub zelle_image_path: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_image_path: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_font_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_top_offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_opacity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zelle_x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zelle_y: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zelle_width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_y: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_width: Option<i64>,
}

/// Bounded numeric layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutField {
    TitleFontSize,
    ItemFontSize,
    ContentTopOffset,
    ContentWidth,
    OverlayOpacity,
    ZelleX,
    ZelleY,
    ZelleWidth,
    ContactX,
    ContactY,
    ContactWidth,
}

impl LayoutField {
    pub const ALL: [LayoutField; 11] = [
        Self::TitleFontSize,
        Self::ItemFontSize,
        Self::ContentTopOffset,
        Self::ContentWidth,
        Self::OverlayOpacity,
        Self::ZelleX,
        Self::ZelleY,
        Self::ZelleWidth,
        Self::ContactX,
        Self::ContactY,
        Self::ContactWidth,
    ];

    /// JSON key of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::TitleFontSize => "titleFontSize",
            Self::ItemFontSize => "itemFontSize",
            Self::ContentTopOffset => "contentTopOffset",
            Self::ContentWidth => "contentWidth",
            Self::OverlayOpacity => "overlayOpacity",
            Self::ZelleX => "zelleX",
            Self::ZelleY => "zelleY",
            Self::ZelleWidth => "zelleWidth",
            Self::ContactX => "contactX",
            Self::ContactY => "contactY",
            Self::ContactWidth => "contactWidth",
        }
    }

    /// Inclusive range accepted for the field.
    pub fn bounds(self) -> RangeInclusive<u32> {
        match self {
            Self::TitleFontSize => 24..=80,
            Self::ItemFontSize => 12..=40,
            Self::ContentTopOffset => 0..=500,
            Self::ContentWidth => 300..=900,
            Self::OverlayOpacity => 0..=80,
            Self::ZelleX | Self::ZelleY | Self::ContactX | Self::ContactY => 0..=2000,
            Self::ZelleWidth | Self::ContactWidth => 40..=600,
        }
    }

    /// Check `value` against [`Self::bounds`].
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] naming the field and its range.
    pub fn check(self, value: i64) -> Result<u32, AppError> {
        let bounds = self.bounds();
        u32::try_from(value)
            .ok()
            .filter(|v| bounds.contains(v))
            .ok_or_else(|| {
                AppError::validation(format!(
                    "{} must be between {} and {}",
                    self.name(),
                    bounds.start(),
                    bounds.end()
                ))
            })
    }

    /// Current value of the field on `menu`.
    pub fn get(self, menu: &Menu) -> u32 {
        match self {
            Self::TitleFontSize => menu.title_font_size,
            Self::ItemFontSize => menu.item_font_size,
            Self::ContentTopOffset => menu.content_top_offset,
            Self::ContentWidth => menu.content_width,
            Self::OverlayOpacity => menu.overlay_opacity,
            Self::ZelleX => menu.zelle_x,
            Self::ZelleY => menu.zelle_y,
            Self::ZelleWidth => menu.zelle_width,
            Self::ContactX => menu.contact_x,
            Self::ContactY => menu.contact_y,
            Self::ContactWidth => menu.contact_width,
        }
    }

    /// Overwrite the field on `menu` without range checks.
    pub fn set(self, menu: &mut Menu, value: u32) {
        *self.slot(menu) = value;
    }

    fn slot(self, menu: &mut Menu) -> &mut u32 {
        match self {
            Self::TitleFontSize => &mut menu.title_font_size,
            Self::ItemFontSize => &mut menu.item_font_size,
            Self::ContentTopOffset => &mut menu.content_top_offset,
            Self::ContentWidth => &mut menu.content_width,
            Self::OverlayOpacity => &mut menu.overlay_opacity,
            Self::ZelleX => &mut menu.zelle_x,
            Self::ZelleY => &mut menu.zelle_y,
            Self::ZelleWidth => &mut menu.zelle_width,
            Self::ContactX => &mut menu.contact_x,
            Self::ContactY => &mut menu.contact_y,
            Self::ContactWidth => &mut menu.contact_width,
        }
    }

    /// Value this field carries in `patch`, if supplied.
    pub fn raw(self, patch: &MenuPatch) -> Option<i64> {
        match self {
            Self::TitleFontSize => patch.title_font_size,
            Self::ItemFontSize => patch.item_font_size,
            Self::ContentTopOffset => patch.content_top_offset,
            Self::ContentWidth => patch.content_width,
            Self::OverlayOpacity => patch.overlay_opacity,
            Self::ZelleX => patch.zelle_x,
            Self::ZelleY => patch.zelle_y,
            Self::ZelleWidth => patch.zelle_width,
            Self::ContactX => patch.contact_x,
            Self::ContactY => patch.contact_y,
            Self::ContactWidth => patch.contact_width,
        }
    }

    fn raw_slot(self, patch: &mut MenuPatch) -> &mut Option<i64> {
        match self {
            Self::TitleFontSize => &mut patch.title_font_size,
            Self::ItemFontSize => &mut patch.item_font_size,
            Self::ContentTopOffset => &mut patch.content_top_offset,
            Self::ContentWidth => &mut patch.content_width,
            Self::OverlayOpacity => &mut patch.overlay_opacity,
            Self::ZelleX => &mut patch.zelle_x,
            Self::ZelleY => &mut patch.zelle_y,
            Self::ZelleWidth => &mut patch.zelle_width,
            Self::ContactX => &mut patch.contact_x,
            Self::ContactY => &mut patch.contact_y,
            Self::ContactWidth => &mut patch.contact_width,
        }
    }
}

/// Image slots a menu can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageField {
    Background,
    Zelle,
    Contact,
}

impl ImageField {
    pub const ALL: [ImageField; 3] = [Self::Background, Self::Zelle, Self::Contact];

    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "backgroundImagePath",
            Self::Zelle => "zelleImagePath",
            Self::Contact => "contactImagePath",
        }
    }

    pub fn get(self, menu: &Menu) -> Option<&str> {
        match self {
            Self::Background => menu.background_image_path.as_deref(),
            Self::Zelle => menu.zelle_image_path.as_deref(),
            Self::Contact => menu.contact_image_path.as_deref(),
        }
    }

    pub fn set(self, menu: &mut Menu, value: Option<String>) {
        *self.slot(menu) = value;
    }

    fn slot(self, menu: &mut Menu) -> &mut Option<String> {
        match self {
            Self::Background => &mut menu.background_image_path,
            Self::Zelle => &mut menu.zelle_image_path,
            Self::Contact => &mut menu.contact_image_path,
        }
    }

    /// `Some(None)` when `patch` clears this slot, `Some(Some(path))` when it sets it.
    pub fn raw(self, patch: &MenuPatch) -> Option<&Option<String>> {
        match self {
            Self::Background => patch.background_image_path.as_ref(),
            Self::Zelle => patch.zelle_image_path.as_ref(),
            Self::Contact => patch.contact_image_path.as_ref(),
        }
    }

    fn raw_slot(self, patch: &mut MenuPatch) -> &mut Option<Option<String>> {
        match self {
            Self::Background => &mut patch.background_image_path,
            Self::Zelle => &mut patch.zelle_image_path,
            Self::Contact => &mut patch.contact_image_path,
        }
    }
}

/// Check that an image reference points into the upload area.
///
/// # Errors
/// Returns [`AppError::Validation`] naming `field` when the path does not start
/// with `/uploads/` or contains a `..` segment.
pub fn validate_image_path(field: ImageField, path: &str) -> Result<(), AppError> {
    let inside_uploads = path
        .strip_prefix(UPLOAD_URL_PREFIX)
        .map(|rest| !rest.is_empty() && !rest.split(['/', '\\']).any(|segment| segment == ".."))
        .unwrap_or(false);
    if inside_uploads {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{} must start with {}",
            field.name(),
            UPLOAD_URL_PREFIX
        )))
    }
}

/// A patch that passed validation; only constructible through [`MenuPatch::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedMenuPatch {
    title: Option<String>,
    status: Option<MenuStatus>,
    images: Vec<(ImageField, Option<String>)>,
    numbers: Vec<(LayoutField, u32)>,
}

impl ValidatedMenuPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.images.is_empty()
            && self.numbers.is_empty()
    }

    /// Write every supplied field onto `menu` and bump `updated_at`.
    pub fn apply_to(&self, menu: &mut Menu) {
        if let Some(title) = &self.title {
            menu.title = title.clone();
        }
        if let Some(status) = self.status {
            menu.status = status;
        }
        for (field, value) in &self.images {
            *field.slot(menu) = value.clone();
        }
        for (field, value) in &self.numbers {
            *field.slot(menu) = *value;
        }
        menu.updated_at = chrono::Utc::now();
    }
}

impl MenuPatch {
    /// Patch setting one bounded numeric field.
    pub fn number(field: LayoutField, value: i64) -> Self {
        let mut patch = Self::default();
        patch.set_number(field, value);
        patch
    }

    /// Set one bounded numeric field on this patch.
    pub fn set_number(&mut self, field: LayoutField, value: i64) {
        *field.raw_slot(self) = Some(value);
    }

    /// Set (or clear with `None`) one image slot on this patch.
    pub fn set_image(&mut self, field: ImageField, value: Option<String>) {
        *field.raw_slot(self) = Some(value);
    }

    /// Supplied numeric fields, in declaration order.
    pub fn numeric_fields(&self) -> Vec<LayoutField> {
        LayoutField::ALL
            .into_iter()
            .filter(|field| field.raw(self).is_some())
            .collect()
    }

    /// Supplied image fields, in declaration order.
    pub fn image_fields(&self) -> Vec<ImageField> {
        ImageField::ALL
            .into_iter()
            .filter(|field| field.raw(self).is_some())
            .collect()
    }

    /// Validate every supplied field.
    ///
    /// # Returns
    /// A [`ValidatedMenuPatch`] holding normalized values.
    ///
    /// # Errors
    /// Returns the first [`AppError::Validation`] encountered; nothing is applied.
    pub fn validate(&self) -> Result<ValidatedMenuPatch, AppError> {
        let title = match self.title.as_deref() {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(AppError::validation("title cannot be empty"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let status = match self.status.as_deref() {
            Some(raw) => Some(raw.parse::<MenuStatus>()?),
            None => None,
        };

        let mut images = Vec::new();
        for field in ImageField::ALL {
            if let Some(value) = field.raw(self) {
                if let Some(path) = value {
                    validate_image_path(field, path)?;
                }
                images.push((field, value.clone()));
            }
        }

        let mut numbers = Vec::new();
        for field in LayoutField::ALL {
            if let Some(raw) = field.raw(self) {
                numbers.push((field, field.check(raw)?));
            }
        }

        Ok(ValidatedMenuPatch {
            title,
            status,
            images,
            numbers,
        })
    }
}

/// Draggable QR overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayTarget {
    Zelle,
    Contact,
}

impl OverlayTarget {
    /// Coordinate fields of the overlay.
    pub fn position_fields(self) -> (LayoutField, LayoutField) {
        match self {
            Self::Zelle => (LayoutField::ZelleX, LayoutField::ZelleY),
            Self::Contact => (LayoutField::ContactX, LayoutField::ContactY),
        }
    }

    pub fn width_field(self) -> LayoutField {
        match self {
            Self::Zelle => LayoutField::ZelleWidth,
            Self::Contact => LayoutField::ContactWidth,
        }
    }

    pub fn image_field(self) -> ImageField {
        match self {
            Self::Zelle => ImageField::Zelle,
            Self::Contact => ImageField::Contact,
        }
    }
}

/// Patch persisting only an overlay's dropped coordinates.
pub fn overlay_position_patch(target: OverlayTarget, x: i64, y: i64) -> MenuPatch {
    let (x_field, y_field) = target.position_fields();
    let mut patch = MenuPatch::default();
    patch.set_number(x_field, x);
    patch.set_number(y_field, y);
    patch
}
