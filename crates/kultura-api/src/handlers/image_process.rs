use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use kultura_core::models::ProcessImageResponse;
use kultura_core::AppError;
use kultura_processing::ProcessingRequest;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Fields of the `POST /api/image/process` multipart form
#[derive(Debug, Default)]
struct ProcessForm {
    image: Option<Vec<u8>>,
    content_type: Option<String>,
    procedure_type: Option<String>,
    enhancement_level: Option<String>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the request size limit: {}", err))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<ProcessForm, AppError> {
    let mut form = ProcessForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "image" => {
                if form.image.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple image fields are not allowed".to_string(),
                    ));
                }
                form.content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(multipart_error)?;
                form.image = Some(data.to_vec());
            }
            "procedureType" => {
                form.procedure_type = Some(field.text().await.map_err(multipart_error)?);
            }
            "enhancementLevel" => {
                form.enhancement_level = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

/// Turn an uploaded photo into a stored original plus a watermarked preview.
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, operation = "process_image")
)]
pub async fn process_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ProcessImageResponse>, HttpAppError> {
    let form = read_form(multipart).await?;
    let pipeline = &state.pipeline;

    let enhancement_level = pipeline
        .validator()
        .parse_enhancement_level(form.enhancement_level.as_deref())?;

    let request = ProcessingRequest {
        data: form.image.unwrap_or_default(),
        content_type: form.content_type,
        procedure_type: form.procedure_type,
        enhancement_level,
        user_id: user.user_id,
    };

    let result = pipeline.process(request).await?;

    Ok(Json(ProcessImageResponse::from(result)))
}
