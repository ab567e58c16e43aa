use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use kultura_core::models::ImageProcessResponse;
use kultura_core::AppError;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: Option<Uuid>,
}

/// Provenance records for the caller (or, for staff and admins, `?userId=`), newest first.
#[tracing::instrument(skip(state, query), fields(user_id = %user.user_id, role = %user.role))]
pub async fn get_image_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ImageProcessResponse>>, HttpAppError> {
    let target = match query.user_id {
        Some(other) if other != user.user_id => {
            if !user.role.can_view_others() {
                return Err(AppError::Forbidden(
                    "Not allowed to view another user's history".to_string(),
                )
                .into());
            }
            other
        }
        _ => user.user_id,
    };

    let records = state.pipeline.history(target).await?;
    tracing::debug!(target_user = %target, count = records.len(), "Fetched image history");

    Ok(Json(records.into_iter().map(ImageProcessResponse::from).collect()))
}
