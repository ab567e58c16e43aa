//! Provenance records for processed previews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::artifact_path;

/// One processed preview: two immutable artifacts plus the request that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ImageProcessRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Filename of the normalized original in the artifact store
    pub original_image: String,
    /// Filename of the watermarked preview in the artifact store
    pub processed_image: String,
    pub procedure_type: String,
    pub enhancement_level: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a provenance record
#[derive(Debug, Clone)]
pub struct NewImageProcess {
    pub user_id: Uuid,
    pub original_image: String,
    pub processed_image: String,
    pub procedure_type: String,
    pub enhancement_level: i32,
}

/// Outcome of a successful processing run. Carries references, never bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub process_id: Uuid,
    pub original_ref: String,
    pub processed_ref: String,
}

/// Response body for `POST /api/image/process`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessImageResponse {
    pub message: String,
    pub process_id: Uuid,
    pub original_image: String,
    pub processed_image: String,
}

impl From<ProcessingResult> for ProcessImageResponse {
    fn from(result: ProcessingResult) -> Self {
        ProcessImageResponse {
            message: "Image processed successfully".to_string(),
            process_id: result.process_id,
            original_image: artifact_path(&result.original_ref),
            processed_image: artifact_path(&result.processed_ref),
        }
    }
}

/// History entry with resolved retrieval paths
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProcessResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub procedure_type: String,
    pub enhancement_level: i32,
    pub created_at: DateTime<Utc>,
    pub original_image: String,
    pub processed_image: String,
}

impl From<ImageProcessRecord> for ImageProcessResponse {
    fn from(record: ImageProcessRecord) -> Self {
        ImageProcessResponse {
            id: record.id,
            user_id: record.user_id,
            procedure_type: record.procedure_type,
            enhancement_level: record.enhancement_level,
            created_at: record.created_at,
            original_image: artifact_path(&record.original_image),
            processed_image: artifact_path(&record.processed_image),
        }
    }
}
