//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use anyhow::{Context, Result};
use kultura_core::Config;
use kultura_db::ImageProcessRepository;
use kultura_processing::{
    BadgeSpec, DecodeLimits, ProcessingPipeline, TransformEngine, UploadValidator,
    WatermarkCompositor,
};
use kultura_storage::Storage;

use crate::state::AppState;

/// Wire the processing pipeline from configuration and its two collaborators
pub fn build_pipeline(
    config: &Config,
    storage: Arc<dyn Storage>,
    repository: Arc<dyn ImageProcessRepository>,
) -> ProcessingPipeline {
    let engine = TransformEngine::new(config.procedure_policy())
        .with_jpeg_quality(config.jpeg_quality())
        .with_decode_limits(DecodeLimits::new(
            config.max_image_dimension(),
            config.max_image_pixels(),
        ));
    let compositor = WatermarkCompositor::new(BadgeSpec::with_text(config.watermark_text()));
    let validator = UploadValidator::new(config.max_upload_size_bytes());

    ProcessingPipeline::new(storage, repository, engine, compositor, validator)
}

/// Initialize the entire application. Telemetry must already be set up.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        procedure_policy = %config.procedure_policy(),
        "Configuration loaded and validated successfully"
    );

    let repository = database::setup_repository(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let pipeline = build_pipeline(&config, storage, repository);
    let state = Arc::new(AppState::new(config.clone(), pipeline));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
