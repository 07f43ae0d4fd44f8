//! Text tone selection against the menu background.

use image::imageops::FilterType;
use image::DynamicImage;

/// Side of the square the background is averaged over.
pub const SAMPLE_SIZE: u32 = 16;
/// Average luminance above which the background counts as light.
pub const LIGHT_THRESHOLD: f32 = 150.0;

/// Colour scheme for menu text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    /// Dark text, no shadow.
    Dark,
    /// Light text with a drop shadow.
    Light,
}

impl TextTone {
    pub fn has_shadow(self) -> bool {
        matches!(self, Self::Light)
    }

    /// RGB used for rows and rules.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Dark => [28, 25, 23],
            Self::Light => [250, 250, 249],
        }
    }
}

/// Mean `0.299R + 0.587G + 0.114B` over a 16x16 downsample of `image`.
pub fn average_luminance(image: &DynamicImage) -> f32 {
    let sample = image
        .resize_exact(SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle)
        .to_rgb8();
    let total: f32 = sample
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
        })
        .sum();
    total / (SAMPLE_SIZE * SAMPLE_SIZE) as f32
}

pub fn tone_for_image(image: &DynamicImage) -> TextTone {
    if average_luminance(image) > LIGHT_THRESHOLD {
        TextTone::Dark
    } else {
        TextTone::Light
    }
}

/// Pick the text tone for an optional encoded background.
///
/// No background means dark text; a background that fails to decode is
/// treated as dark imagery and gets light text.
pub fn tone_for_background(bytes: Option<&[u8]>) -> TextTone {
    let Some(bytes) = bytes else {
        return TextTone::Dark;
    };
    match image::load_from_memory(bytes) {
        Ok(image) => tone_for_image(&image),
        Err(err) => {
            tracing::debug!("background did not decode, using light text: {}", err);
            TextTone::Light
        }
    }
}

/// Dim strength over the background: `opacity / 100`, or nothing without a background.
pub fn overlay_alpha(has_background: bool, opacity: u32) -> f32 {
    if has_background {
        opacity.min(100) as f32 / 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn solid(rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb(rgb)))
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn luminance_of_solid_images() {
        assert!((average_luminance(&solid([255, 255, 255])) - 255.0).abs() < 0.5);
        assert!(average_luminance(&solid([0, 0, 0])) < 0.5);
        let grey = average_luminance(&solid([100, 100, 100]));
        assert!((grey - 100.0).abs() < 0.5);
    }

    #[test]
    fn tone_follows_threshold() {
        assert_eq!(tone_for_image(&solid([240, 240, 230])), TextTone::Dark);
        assert_eq!(tone_for_image(&solid([20, 30, 40])), TextTone::Light);
        assert_eq!(tone_for_image(&solid([140, 140, 140])), TextTone::Light);
    }

    #[test]
    fn background_bytes_select_tone() {
        assert_eq!(tone_for_background(None), TextTone::Dark);
        assert_eq!(tone_for_background(Some(b"not an image")), TextTone::Light);
        let light = png_bytes(&solid([250, 250, 250]));
        assert_eq!(tone_for_background(Some(&light)), TextTone::Dark);
        assert!(TextTone::Light.has_shadow());
        assert!(!TextTone::Dark.has_shadow());
    }

    #[test]
    fn overlay_alpha_needs_background() {
        assert_eq!(overlay_alpha(false, 60), 0.0);
        assert!((overlay_alpha(true, 35) - 0.35).abs() < 1e-6);
        assert_eq!(overlay_alpha(true, 0), 0.0);
    }
}
