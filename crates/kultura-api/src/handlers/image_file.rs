use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use kultura_core::constants::ARTIFACT_CONTENT_TYPE;
use kultura_core::AppError;
use kultura_storage::validate_filename;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Artifacts are immutable once written
const ARTIFACT_CACHE_CONTROL: &str = "private, max-age=31536000, immutable";

/// Stream a stored artifact by its exact filename.
#[tracing::instrument(skip(state))]
pub async fn get_image_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    validate_filename(&filename)?;

    let stream = state.pipeline.storage().read_stream(&filename).await?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, ARTIFACT_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, ARTIFACT_CACHE_CONTROL)
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
