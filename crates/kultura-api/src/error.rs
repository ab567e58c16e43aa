//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors from the
//! storage, processing and persistence crates convert into `HttpAppError` with `?`
//! and render as a single JSON error object.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kultura_core::{AppError, ErrorMetadata, LogLevel};
use kultura_processing::{PipelineError, ProcessingError, ValidationError};
use kultura_storage::StorageError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            error_type: None,
            code: code.into(),
            recoverable: false,
            suggested_action: None,
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: AppError lives in kultura-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .or_else(|_| std::env::var("NODE_ENV"))
        .map(|env| {
            let env = env.to_lowercase();
            env == "production" || env == "prod"
        })
        .unwrap_or(false)
}

/// Build the JSON body for `error`. Details are only exposed outside production
/// and never for sensitive errors.
pub fn error_body(error: &AppError, is_production: bool) -> ErrorResponse {
    let expose = !is_production && !error.is_sensitive();
    ErrorResponse {
        error: error.client_message(),
        details: expose.then(|| error.detailed_message()),
        error_type: expose.then(|| error.error_type().to_string()),
        code: error.error_code().to_string(),
        recoverable: error.is_recoverable(),
        suggested_action: error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_body(app_error, is_production_env()))).into_response()
    }
}

// Domain errors into HttpAppError

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(_) => AppError::NotFound("Image not found".to_string()),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::WriteFailed(msg) => AppError::StorageWrite(msg),
            StorageError::ReadFailed(msg) => AppError::StorageRead(msg),
            StorageError::Io(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::Config(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::MissingUser => AppError::Unauthorized(err.to_string()),
            ValidationError::EmptyFile
            | ValidationError::InvalidContentType { .. }
            | ValidationError::MissingProcedureType
            | ValidationError::InvalidEnhancementLevel(_) => AppError::InvalidInput(err.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let app = match err {
            ProcessingError::UnsupportedFormat(_) => {
                AppError::UnsupportedFormat("Unsupported or corrupt image".to_string())
            }
            ProcessingError::ImageTooLarge(msg) => AppError::PayloadTooLarge(msg),
            ProcessingError::InvalidParameter(msg) => AppError::InvalidParameter(msg),
            ProcessingError::Encode(msg) | ProcessingError::TaskJoin(msg) => {
                AppError::Internal(msg)
            }
        };
        HttpAppError(app)
    }
}

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => e.into(),
            PipelineError::Processing(e) => e.into(),
            PipelineError::Storage(e) => e.into(),
            PipelineError::Persistence(e) => HttpAppError(e),
        }
    }
}
