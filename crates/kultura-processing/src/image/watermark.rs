use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use kultura_core::constants::{DEFAULT_JPEG_QUALITY, DEFAULT_WATERMARK_TEXT};

use super::codec::{decode_image, encode_jpeg};
use crate::error::ProcessingError;

const GLYPH_SIZE: u32 = 8;

/// Branding badge configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeSpec {
    pub text: String,
    pub width: u32,
    pub height: u32,
    pub corner_radius: u32,
    pub background: Rgba<u8>,
    pub text_color: Rgba<u8>,
    /// Glyph pixel size multiplier
    pub text_scale: u32,
}

impl Default for BadgeSpec {
    fn default() -> Self {
        Self {
            text: DEFAULT_WATERMARK_TEXT.to_string(),
            width: 200,
            height: 50,
            corner_radius: 5,
            background: Rgba([255, 255, 255, 204]),
            text_color: Rgba([0x56, 0x82, 0x03, 255]),
            text_scale: 1,
        }
    }
}

impl BadgeSpec {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

pub struct Watermark;

impl Watermark {
    /// Rasterize the badge: rounded translucent panel with centered text.
    pub fn render_badge(spec: &BadgeSpec) -> RgbaImage {
        let (w, h) = (spec.width.max(1), spec.height.max(1));
        let mut badge = RgbaImage::new(w, h);

        let r = spec.corner_radius.min(w / 2).min(h / 2);
        if r == 0 {
            draw_filled_rect_mut(&mut badge, Rect::at(0, 0).of_size(w, h), spec.background);
        } else {
            if w > 2 * r {
                draw_filled_rect_mut(
                    &mut badge,
                    Rect::at(r as i32, 0).of_size(w - 2 * r, h),
                    spec.background,
                );
            }
            if h > 2 * r {
                draw_filled_rect_mut(
                    &mut badge,
                    Rect::at(0, r as i32).of_size(w, h - 2 * r),
                    spec.background,
                );
            }
            let (ri, right, bottom) = (r as i32, (w - 1 - r) as i32, (h - 1 - r) as i32);
            for center in [(ri, ri), (right, ri), (ri, bottom), (right, bottom)] {
                draw_filled_circle_mut(&mut badge, center, ri, spec.background);
            }
        }

        Self::draw_text(&mut badge, spec);
        badge
    }

    fn draw_text(badge: &mut RgbaImage, spec: &BadgeSpec) {
        let scale = spec.text_scale.max(1);
        let glyph = GLYPH_SIZE * scale;
        let text_width = spec.text.chars().count() as u32 * glyph;
        let x0 = badge.width().saturating_sub(text_width) / 2;
        let y0 = badge.height().saturating_sub(glyph) / 2;

        for (i, c) in spec.text.chars().enumerate() {
            let Some(rows) = BASIC_FONTS.get(c) else {
                continue;
            };
            let gx = x0 + i as u32 * glyph;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits >> col & 1 == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let x = gx + col * scale + dx;
                            let y = y0 + row as u32 * scale + dy;
                            if x < badge.width() && y < badge.height() {
                                badge.put_pixel(x, y, spec.text_color);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Overlay a pre-rendered badge at the bottom-right corner.
    /// Images smaller than the badge get a cropped badge.
    pub fn overlay_badge(img: DynamicImage, badge: &RgbaImage) -> DynamicImage {
        let (img_width, img_height) = img.dimensions();
        let x = img_width as i64 - badge.width() as i64;
        let y = img_height as i64 - badge.height() as i64;

        let mut img_rgba = img.to_rgba8();
        imageops::overlay(&mut img_rgba, badge, x, y);

        DynamicImage::ImageRgba8(img_rgba)
    }

    /// Apply the badge described by `spec`
    pub fn apply(img: DynamicImage, spec: &BadgeSpec) -> DynamicImage {
        Self::overlay_badge(img, &Self::render_badge(spec))
    }

    /// Decode, watermark and re-encode as JPEG
    pub fn composite(data: &[u8], spec: &BadgeSpec) -> Result<Vec<u8>, ProcessingError> {
        let img = decode_image(data)?;
        encode_jpeg(&Self::apply(img, spec), DEFAULT_JPEG_QUALITY)
    }
}

/// Badge renderer with the badge rasterized once up front
#[derive(Debug, Clone)]
pub struct WatermarkCompositor {
    spec: BadgeSpec,
    badge: RgbaImage,
}

impl Default for WatermarkCompositor {
    fn default() -> Self {
        Self::new(BadgeSpec::default())
    }
}

impl WatermarkCompositor {
    pub fn new(spec: BadgeSpec) -> Self {
        let badge = Watermark::render_badge(&spec);
        Self { spec, badge }
    }

    pub fn spec(&self) -> &BadgeSpec {
        &self.spec
    }

    pub fn apply(&self, img: DynamicImage) -> DynamicImage {
        Watermark::overlay_badge(img, &self.badge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;
    use std::io::Cursor;

    const BRAND_GREEN: [u8; 4] = [0x56, 0x82, 0x03, 255];

    fn is_brand_green(p: &Rgba<u8>) -> bool {
        p.0.iter()
            .zip(BRAND_GREEN.iter())
            .all(|(a, b)| a.abs_diff(*b) <= 1)
    }

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([0, 0, 0, 255]),
        ))
    }

    #[test]
    fn test_watermark_badge_shape() {
        let badge = Watermark::render_badge(&BadgeSpec::default());

        assert_eq!(badge.dimensions(), (200, 50));
        // Rounded corners stay transparent, the panel itself is translucent white.
        assert_eq!(badge.get_pixel(0, 0)[3], 0);
        assert_eq!(badge.get_pixel(199, 49)[3], 0);
        assert_eq!(badge.get_pixel(100, 2).0, [255, 255, 255, 204]);
        assert!(badge.pixels().any(|p| p.0 == BRAND_GREEN));
    }

    #[test]
    fn test_watermark_bottom_right() {
        let img = create_test_image(400, 300);

        let result = Watermark::apply(img, &BadgeSpec::default()).to_rgba8();

        assert_eq!(result.dimensions(), (400, 300));
        assert_eq!(result.get_pixel(10, 10).0, [0, 0, 0, 255]);
        // Just above and left of the badge: untouched.
        assert_eq!(result.get_pixel(199, 249).0, [0, 0, 0, 255]);
        // Panel background blended over black.
        let panel = result.get_pixel(300, 252);
        assert!(panel[0] > 150 && panel[0] < 255);
        // Text lands inside the badge area only.
        let text_pixels = result
            .enumerate_pixels()
            .filter(|(_, _, p)| is_brand_green(p))
            .collect::<Vec<_>>();
        assert!(!text_pixels.is_empty());
        assert!(text_pixels.iter().all(|(x, y, _)| *x >= 200 && *y >= 250));
    }

    #[test]
    fn test_watermark_smaller_than_badge() {
        let img = create_test_image(120, 30);

        let result = Watermark::apply(img, &BadgeSpec::default());

        assert_eq!(result.dimensions(), (120, 30));
    }

    #[test]
    fn test_watermark_custom_text_and_scale() {
        let spec = BadgeSpec {
            text_scale: 2,
            ..BadgeSpec::with_text("KV")
        };
        let badge = Watermark::render_badge(&spec);

        let green = badge.pixels().filter(|p| p.0 == BRAND_GREEN).count();
        let small = Watermark::render_badge(&BadgeSpec::with_text("KV"))
            .pixels()
            .filter(|p| p.0 == BRAND_GREEN)
            .count();
        assert_eq!(green, small * 4);
    }

    #[test]
    fn test_watermark_compositor_matches_apply() {
        let compositor = WatermarkCompositor::default();
        let img = create_test_image(250, 80);

        let cached = compositor.apply(img.clone()).to_rgba8();
        let direct = Watermark::apply(img, compositor.spec()).to_rgba8();

        assert_eq!(cached, direct);
    }

    #[test]
    fn test_watermark_composite_bytes() {
        let mut png = Vec::new();
        create_test_image(300, 100)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let jpeg = Watermark::composite(&png, &BadgeSpec::default()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        assert!(matches!(
            Watermark::composite(b"not an image", &BadgeSpec::default()),
            Err(ProcessingError::UnsupportedFormat(_))
        ));
    }
}
