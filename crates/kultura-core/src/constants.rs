//! Application-wide constants.

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Public retrieval path for stored artifacts; a filename is appended.
pub const IMAGE_FILE_PATH: &str = "/api/image/file";

/// Maximum accepted image upload (5 MiB).
pub const MAX_UPLOAD_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Largest accepted decoded width or height, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 8192;

/// Largest accepted decoded area (25 MP).
pub const MAX_IMAGE_PIXELS: u64 = 25_000_000;

/// Enhancement level used when the form field is omitted.
pub const DEFAULT_ENHANCEMENT_LEVEL: i32 = 50;

/// Inclusive bounds for the enhancement level.
pub const MIN_ENHANCEMENT_LEVEL: i32 = 10;
pub const MAX_ENHANCEMENT_LEVEL: i32 = 100;

/// JPEG quality used for both stored artifacts.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Text of the branding badge composited onto every processed preview.
pub const DEFAULT_WATERMARK_TEXT: &str = "KulturaView Preview";

/// Content type of every stored artifact.
pub const ARTIFACT_CONTENT_TYPE: &str = "image/jpeg";

/// Build the public retrieval path for an artifact filename.
pub fn artifact_path(filename: &str) -> String {
    format!("{}/{}", IMAGE_FILE_PATH, filename)
}
