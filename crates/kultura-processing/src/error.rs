use kultura_core::AppError;
use kultura_storage::StorageError;

use crate::validator::ValidationError;

/// Errors raised by the transform engine and the watermark compositor
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image too large: {0}")]
    ImageTooLarge(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Processing task failed: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(err: tokio::task::JoinError) -> Self {
        ProcessingError::TaskJoin(err.to_string())
    }
}

/// Failure of one processing run. Each variant names the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Persistence error: {0}")]
    Persistence(#[source] AppError),
}
