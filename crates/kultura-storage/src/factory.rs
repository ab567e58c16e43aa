use crate::{LocalStorage, Storage, StorageBackend, StorageResult};
use kultura_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        StorageBackend::Local => {
            let storage = LocalStorage::new(config.uploads_dir()).await?;
            tracing::info!(
                backend = %StorageBackend::Local,
                path = %storage.base_path().display(),
                "Artifact storage initialized"
            );
            Ok(Arc::new(storage))
        }
    }
}
