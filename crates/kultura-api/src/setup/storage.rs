//! Artifact storage setup

use std::sync::Arc;

use anyhow::{Context, Result};
use kultura_core::Config;
use kultura_storage::{create_storage, Storage};

/// Resolve the artifact root once and make sure it exists
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    create_storage(config)
        .await
        .with_context(|| format!("Failed to initialize storage at {}", config.uploads_dir()))
}
