//! Repository for image process provenance records

use async_trait::async_trait;
use kultura_core::models::{ImageProcessRecord, NewImageProcess};
use kultura_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence collaborator for provenance records
#[async_trait]
pub trait ImageProcessRepository: Send + Sync {
    /// Insert a record. Called once per request, after both artifacts are written.
    async fn create(&self, new: NewImageProcess) -> Result<ImageProcessRecord, AppError>;

    /// All records owned by `user_id`, newest first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ImageProcessRecord>, AppError>;
}

/// Postgres-backed repository
#[derive(Clone)]
pub struct PgImageProcessRepository {
    pool: PgPool,
}

impl PgImageProcessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageProcessRepository for PgImageProcessRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "image_processes", db.operation = "insert", user_id = %new.user_id))]
    async fn create(&self, new: NewImageProcess) -> Result<ImageProcessRecord, AppError> {
        let record = sqlx::query_as::<Postgres, ImageProcessRecord>(
            r#"
            INSERT INTO image_processes (user_id, original_image, processed_image, procedure_type, enhancement_level)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, original_image, processed_image, procedure_type, enhancement_level, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.original_image)
        .bind(&new.processed_image)
        .bind(&new.procedure_type)
        .bind(new.enhancement_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "image_processes", db.operation = "select"))]
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ImageProcessRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, ImageProcessRecord>(
            r#"
            SELECT id, user_id, original_image, processed_image, procedure_type, enhancement_level, created_at
            FROM image_processes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
