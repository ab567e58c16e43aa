//! Processing pipeline: validate, store original, transform, watermark,
//! store preview, record provenance.
//!
//! Every step is a single attempt. If anything after the original has been
//! stored fails, the artifacts written for that request are removed again
//! (best effort) so a failed run leaves neither files nor a record behind.

use std::sync::Arc;
use std::time::Instant;

use kultura_core::models::{ImageProcessRecord, NewImageProcess, ProcessingResult};
use kultura_core::AppError;
use kultura_db::ImageProcessRepository;
use kultura_storage::{generate_artifact_name, ArtifactKind, Storage};
use uuid::Uuid;

use crate::error::{PipelineError, ProcessingError};
use crate::image::{
    decode_image_with_limits, encode_jpeg, EnhancementLevel, ProcedureType, TransformEngine,
    WatermarkCompositor,
};
use crate::validator::UploadValidator;

/// One inbound preview request
#[derive(Debug, Clone)]
pub struct ProcessingRequest {
    pub data: Vec<u8>,
    /// Declared content type of the upload, if any
    pub content_type: Option<String>,
    pub procedure_type: Option<String>,
    pub enhancement_level: i32,
    pub user_id: Uuid,
}

/// Shared, cheaply cloneable orchestrator
#[derive(Clone)]
pub struct ProcessingPipeline {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn ImageProcessRepository>,
    engine: Arc<TransformEngine>,
    compositor: Arc<WatermarkCompositor>,
    validator: UploadValidator,
}

impl ProcessingPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn ImageProcessRepository>,
        engine: TransformEngine,
        compositor: WatermarkCompositor,
        validator: UploadValidator,
    ) -> Self {
        Self {
            storage,
            repository,
            engine: Arc::new(engine),
            compositor: Arc::new(compositor),
            validator,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn validator(&self) -> &UploadValidator {
        &self.validator
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    /// Provenance records for `user_id`, newest first
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<ImageProcessRecord>, AppError> {
        self.repository.list_for_user(user_id).await
    }

    #[tracing::instrument(
        skip(self, request),
        fields(user_id = %request.user_id, size_bytes = request.data.len())
    )]
    pub async fn process(
        &self,
        request: ProcessingRequest,
    ) -> Result<ProcessingResult, PipelineError> {
        let start = Instant::now();
        let ProcessingRequest {
            data,
            content_type,
            procedure_type,
            enhancement_level,
            user_id,
        } = request;

        // Step 1: validate. Nothing is written until this has passed.
        self.validator.validate_user(user_id)?;
        self.validator.validate_file_size(data.len())?;
        self.validator
            .validate_content_type(content_type.as_deref())?;
        let procedure: ProcedureType = self
            .validator
            .validate_procedure_type(procedure_type.as_deref())?
            .parse()?;
        let level = EnhancementLevel::new(enhancement_level)?;
        self.engine.recipe_for(&procedure)?;

        let quality = self.engine.jpeg_quality();
        let limits = self.engine.decode_limits();
        let (decoded, original_jpeg) = tokio::task::spawn_blocking(move || {
            let img = decode_image_with_limits(&data, &limits)?;
            let jpeg = encode_jpeg(&img, quality)?;
            Ok::<_, ProcessingError>((img, jpeg))
        })
        .await
        .map_err(ProcessingError::from)??;

        // Step 2: the normalized original.
        let original_name = generate_artifact_name(ArtifactKind::Original, user_id);
        self.storage.save(&original_name, original_jpeg).await?;

        let mut written = vec![original_name.clone()];
        let outcome = self
            .transform_and_record(decoded, &procedure, level, user_id, &original_name, &mut written)
            .await;

        match outcome {
            Ok(result) => {
                tracing::info!(
                    process_id = %result.process_id,
                    procedure = %procedure,
                    level = level.value(),
                    original = %result.original_ref,
                    processed = %result.processed_ref,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Image processed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, procedure = %procedure, "Image processing failed");
                self.cleanup(&written).await;
                Err(e)
            }
        }
    }

    /// Steps 3 to 5. Every artifact name is pushed to `written` before its save.
    async fn transform_and_record(
        &self,
        decoded: image::DynamicImage,
        procedure: &ProcedureType,
        level: EnhancementLevel,
        user_id: Uuid,
        original_name: &str,
        written: &mut Vec<String>,
    ) -> Result<ProcessingResult, PipelineError> {
        let engine = self.engine.clone();
        let compositor = self.compositor.clone();
        let blocking_procedure = procedure.clone();
        let processed_jpeg = tokio::task::spawn_blocking(move || {
            let transformed = engine.transform_image(&decoded, &blocking_procedure, level)?;
            let branded = compositor.apply(transformed);
            encode_jpeg(&branded, engine.jpeg_quality())
        })
        .await
        .map_err(ProcessingError::from)??;

        let processed_name = generate_artifact_name(ArtifactKind::Processed, user_id);
        written.push(processed_name.clone());
        self.storage.save(&processed_name, processed_jpeg).await?;

        let record = self
            .repository
            .create(NewImageProcess {
                user_id,
                original_image: original_name.to_string(),
                processed_image: processed_name.clone(),
                procedure_type: procedure.as_str().to_string(),
                enhancement_level: level.value(),
            })
            .await
            .map_err(PipelineError::Persistence)?;

        Ok(ProcessingResult {
            process_id: record.id,
            original_ref: original_name.to_string(),
            processed_ref: processed_name,
        })
    }

    async fn cleanup(&self, written: &[String]) {
        for filename in written {
            if let Err(e) = self.storage.delete(filename).await {
                tracing::warn!(key = %filename, error = %e, "Failed to remove artifact after processing failure");
            }
        }
    }
}
