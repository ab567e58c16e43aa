//! Tone and spatial filters used by procedure recipes

use image::{DynamicImage, Rgba, RgbaImage};

/// Mild sharpening kernel, normalized to sum to one
const SHARPEN_KERNEL: [f32; 9] = [
    -1.0 / 24.0,
    -1.0 / 24.0,
    -1.0 / 24.0,
    -1.0 / 24.0,
    32.0 / 24.0,
    -1.0 / 24.0,
    -1.0 / 24.0,
    -1.0 / 24.0,
    -1.0 / 24.0,
];

/// Multiplicative tone change. Each field is a coefficient `c`; at a given
/// enhancement factor the channel multiplier is `1 + c * factor`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToneAdjustment {
    pub saturation: f32,
    pub brightness: f32,
}

impl ToneAdjustment {
    pub const NONE: ToneAdjustment = ToneAdjustment {
        saturation: 0.0,
        brightness: 0.0,
    };

    pub fn new(saturation: f32, brightness: f32) -> Self {
        Self {
            saturation,
            brightness,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.saturation == 0.0 && self.brightness == 0.0
    }

    /// Apply in place. Alpha is left untouched.
    pub fn apply(&self, img: &mut RgbaImage, factor: f32) {
        if self.is_identity() {
            return;
        }

        let saturation = 1.0 + self.saturation * factor;
        let brightness = 1.0 + self.brightness * factor;

        for pixel in img.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let (r, g, b) = (r as f32, g as f32, b as f32);
            // Rec. 601 luma
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            let adjust = |c: f32| clamp_channel((luma + (c - luma) * saturation) * brightness);
            *pixel = Rgba([adjust(r), adjust(g), adjust(b), a]);
        }
    }
}

/// Neighbourhood filter applied after the tone change
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpatialFilter {
    #[default]
    None,
    Sharpen,
    /// Gaussian blur with `sigma = sigma_per_factor * factor`
    GaussianBlur { sigma_per_factor: f32 },
}

impl SpatialFilter {
    pub fn apply(&self, img: RgbaImage, factor: f32) -> RgbaImage {
        match *self {
            SpatialFilter::None => img,
            SpatialFilter::Sharpen => sharpen(&img),
            SpatialFilter::GaussianBlur { sigma_per_factor } => {
                let sigma = sigma_per_factor * factor;
                if sigma <= 0.0 {
                    return img;
                }
                imageproc::filter::gaussian_blur_f32(&img, sigma)
            }
        }
    }
}

fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Sharpen RGB with edge pixels clamped. Alpha is copied through.
fn sharpen(img: &RgbaImage) -> RgbaImage {
    // Accumulate in f32 so flat regions round back to their exact value
    let filtered = imageproc::filter::filter3x3::<_, f32, f32>(img, &SHARPEN_KERNEL);
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let f = filtered.get_pixel(x, y);
        Rgba([
            clamp_channel(f[0]),
            clamp_channel(f[1]),
            clamp_channel(f[2]),
            img.get_pixel(x, y)[3],
        ])
    })
}

/// Composite any alpha over white and drop the channel, ready for JPEG.
pub fn flatten_to_rgb(img: &DynamicImage) -> image::RgbImage {
    let rgba = img.to_rgba8();
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| clamp_channel(c as f32 * alpha + 255.0 * (1.0 - alpha));
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_tone_identity_is_noop() {
        let mut img = flat(4, 4, [120, 80, 60, 255]);
        ToneAdjustment::NONE.apply(&mut img, 1.0);
        assert_eq!(img.get_pixel(0, 0).0, [120, 80, 60, 255]);
    }

    #[test]
    fn test_brightness_scales_channels() {
        let mut img = flat(2, 2, [100, 100, 100, 255]);
        ToneAdjustment::new(0.0, 0.2).apply(&mut img, 1.0);
        assert_eq!(img.get_pixel(1, 1).0, [120, 120, 120, 255]);
    }

    #[test]
    fn test_brightness_clamps() {
        let mut img = flat(1, 1, [250, 10, 128, 7]);
        ToneAdjustment::new(0.0, 1.0).apply(&mut img, 1.0);
        assert_eq!(img.get_pixel(0, 0).0, [255, 20, 255, 7]);
    }

    #[test]
    fn test_saturation_leaves_gray_alone_and_spreads_color() {
        let mut gray = flat(1, 1, [90, 90, 90, 255]);
        ToneAdjustment::new(0.5, 0.0).apply(&mut gray, 1.0);
        assert_eq!(gray.get_pixel(0, 0).0, [90, 90, 90, 255]);

        let mut color = flat(1, 1, [150, 100, 90, 255]);
        ToneAdjustment::new(0.5, 0.0).apply(&mut color, 1.0);
        let [r, g, b, _] = color.get_pixel(0, 0).0;
        assert!(r > 150);
        assert!(g < 100 || b < 90);
    }

    #[test]
    fn test_sharpen_keeps_flat_regions() {
        let img = flat(5, 5, [77, 133, 201, 255]);
        let out = SpatialFilter::Sharpen.apply(img.clone(), 1.0);
        assert_eq!(out, img);
    }

    #[test]
    fn test_sharpen_increases_edge_contrast() {
        let img = RgbaImage::from_fn(6, 1, |x, _| {
            if x < 3 {
                Rgba([100, 100, 100, 255])
            } else {
                Rgba([150, 150, 150, 255])
            }
        });
        let out = SpatialFilter::Sharpen.apply(img, 1.0);
        assert!(out.get_pixel(2, 0)[0] < 100);
        assert!(out.get_pixel(3, 0)[0] > 150);
    }

    #[test]
    fn test_sharpen_passes_alpha_through() {
        let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([60, 90, 120, (x * 60 + y) as u8]));
        let out = SpatialFilter::Sharpen.apply(img.clone(), 1.0);
        for (a, b) in out.pixels().zip(img.pixels()) {
            assert_eq!(a[3], b[3]);
        }
    }

    #[test]
    fn test_blur_smooths_edges() {
        let img = RgbaImage::from_fn(8, 8, |x, _| {
            if x % 2 == 0 {
                Rgba([40, 40, 40, 255])
            } else {
                Rgba([200, 200, 200, 255])
            }
        });
        let out = SpatialFilter::GaussianBlur {
            sigma_per_factor: 0.5,
        }
        .apply(img, 1.0);
        let p = out.get_pixel(3, 3)[0];
        assert!(p > 40 && p < 200);
    }

    #[test]
    fn test_flatten_composites_over_white() {
        let img = DynamicImage::ImageRgba8(flat(1, 1, [0, 0, 0, 0]));
        assert_eq!(flatten_to_rgb(&img).get_pixel(0, 0).0, [255, 255, 255]);

        let img = DynamicImage::ImageRgba8(flat(1, 1, [10, 20, 30, 255]));
        assert_eq!(flatten_to_rgb(&img).get_pixel(0, 0).0, [10, 20, 30]);
    }
}
