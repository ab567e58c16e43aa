use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError, ImageReader, Limits};
use kultura_core::constants::{MAX_IMAGE_DIMENSION, MAX_IMAGE_PIXELS};
use std::io::Cursor;

use super::filters::flatten_to_rgb;
use crate::error::ProcessingError;

/// Bounds on decoded image size. A small, highly compressible upload can
/// expand to an arbitrarily large raster, so these are checked before the
/// pixel buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum width and height, each
    pub max_dimension: u32,
    /// Maximum `width * height`
    pub max_pixels: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_dimension: MAX_IMAGE_DIMENSION,
            max_pixels: MAX_IMAGE_PIXELS,
        }
    }
}

impl DecodeLimits {
    pub fn new(max_dimension: u32, max_pixels: u64) -> Self {
        Self {
            max_dimension,
            max_pixels,
        }
    }

    fn to_reader_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);
        // Four bytes per pixel covers the widest buffer we decode into
        limits.max_alloc = Some(self.max_pixels.saturating_mul(4));
        limits
    }

    fn check(&self, width: u32, height: u32) -> Result<(), ProcessingError> {
        let pixels = width as u64 * height as u64;
        if width > self.max_dimension || height > self.max_dimension || pixels > self.max_pixels {
            return Err(ProcessingError::ImageTooLarge(format!(
                "{}x{} exceeds the limit of {} px per side and {} pixels",
                width, height, self.max_dimension, self.max_pixels
            )));
        }
        Ok(())
    }
}

fn decode_error(err: ImageError, limits: &DecodeLimits) -> ProcessingError {
    match err {
        ImageError::Limits(e) => ProcessingError::ImageTooLarge(format!(
            "{} (max {} px per side, {} pixels)",
            e, limits.max_dimension, limits.max_pixels
        )),
        other => ProcessingError::UnsupportedFormat(other.to_string()),
    }
}

/// Decode raw upload bytes with the default size limits.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    decode_image_with_limits(data, &DecodeLimits::default())
}

/// Decode raw upload bytes, sniffing the format from content.
pub fn decode_image_with_limits(
    data: &[u8],
    limits: &DecodeLimits,
) -> Result<DynamicImage, ProcessingError> {
    let mut reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ProcessingError::UnsupportedFormat(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ProcessingError::UnsupportedFormat(
            "Could not determine image format".to_string(),
        ));
    }

    reader.limits(limits.to_reader_limits());
    let img = reader.decode().map_err(|e| decode_error(e, limits))?;
    limits.check(img.width(), img.height())?;
    Ok(img)
}

/// Encode as baseline JPEG, flattening any alpha over white.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let rgb = flatten_to_rgb(img);
    let estimated_size = (rgb.width() * rgb.height()) as usize / 4;
    let mut buffer = Vec::with_capacity(estimated_size);

    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder
            .encode_image(&rgb)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;
    }

    Ok(buffer)
}
