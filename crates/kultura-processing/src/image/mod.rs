//! Image processing module
//!
//! - procedure types and enhancement levels (procedure)
//! - tone and spatial filters (filters)
//! - the procedure-keyed transform engine (transformer)
//! - the branding badge (watermark)

pub mod codec;
pub mod filters;
pub mod procedure;
pub mod transformer;
pub mod watermark;

pub use codec::{decode_image, decode_image_with_limits, encode_jpeg, DecodeLimits};
pub use filters::{SpatialFilter, ToneAdjustment};
pub use procedure::{EnhancementLevel, ProcedureType};
pub use transformer::{Recipe, TransformEngine};
pub use watermark::{BadgeSpec, Watermark, WatermarkCompositor};
