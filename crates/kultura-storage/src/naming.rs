//! Artifact name generation and validation.
//!
//! Names are `{kind}_{unix_millis}_{user_id}_{random8}.jpg`. The random suffix
//! keeps names unique for repeated requests from the same user within one
//! millisecond.

use crate::traits::{StorageError, StorageResult};
use uuid::Uuid;

/// Which half of an artifact pair a name is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Original,
    Processed,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Original => "original",
            ArtifactKind::Processed => "processed",
        }
    }
}

/// Generate a fresh artifact filename for `user_id`.
pub fn generate_artifact_name(kind: ArtifactKind, user_id: Uuid) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}_{}.jpg", kind.as_str(), millis, user_id, &random[..8])
}

/// Reject anything that is not a single, plain path component.
pub fn validate_filename(filename: &str) -> StorageResult<()> {
    if filename.is_empty() || filename.contains("..") {
        return Err(StorageError::InvalidKey(
            "Artifact name is empty or contains a parent reference".to_string(),
        ));
    }

    // Hidden names are reserved for in-flight temp files
    if filename.starts_with('.') {
        return Err(StorageError::InvalidKey(
            "Artifact name must not start with '.'".to_string(),
        ));
    }

    if let Some(c) = filename
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(StorageError::InvalidKey(format!(
            "Artifact name contains invalid character {:?}",
            c
        )));
    }

    Ok(())
}
