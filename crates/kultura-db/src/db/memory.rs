//! In-memory repository used when no database is configured

use async_trait::async_trait;
use chrono::Utc;
use kultura_core::models::{ImageProcessRecord, NewImageProcess};
use kultura_core::AppError;
use std::sync::RwLock;
use uuid::Uuid;

use super::image_process::ImageProcessRepository;

#[derive(Default)]
pub struct InMemoryImageProcessRepository {
    records: RwLock<Vec<ImageProcessRecord>>,
}

impl InMemoryImageProcessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> AppError {
    AppError::Internal("in-memory repository lock poisoned".to_string())
}

#[async_trait]
impl ImageProcessRepository for InMemoryImageProcessRepository {
    async fn create(&self, new: NewImageProcess) -> Result<ImageProcessRecord, AppError> {
        let record = ImageProcessRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            original_image: new.original_image,
            processed_image: new.processed_image,
            procedure_type: new.procedure_type,
            enhancement_level: new.enhancement_level,
            created_at: Utc::now(),
        };

        self.records
            .write()
            .map_err(|_| poisoned())?
            .push(record.clone());

        Ok(record)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ImageProcessRecord>, AppError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        // Insertion order is creation order, so reversing gives newest first.
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}
