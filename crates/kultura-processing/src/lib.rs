//! KulturaView Processing Library
//!
//! The photo-to-preview pipeline: upload validation, the procedure-keyed
//! transform engine, the branding watermark and the orchestrator that ties
//! them to artifact storage and provenance records.

pub mod error;
pub mod image;
pub mod pipeline;
pub mod validator;

pub use error::{PipelineError, ProcessingError};
pub use crate::image::{
    BadgeSpec, DecodeLimits, EnhancementLevel, ProcedureType, Recipe, SpatialFilter, ToneAdjustment,
    TransformEngine, Watermark, WatermarkCompositor,
};
pub use pipeline::{ProcessingPipeline, ProcessingRequest};
pub use validator::{UploadValidator, ValidationError};
