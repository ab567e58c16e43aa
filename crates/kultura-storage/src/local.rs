use crate::naming::validate_filename;
use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoredArtifact};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use kultura_core::constants::ARTIFACT_CONTENT_TYPE;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for artifacts (e.g., "/tmp/uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert an artifact name to a filesystem path inside the root
    fn key_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        validate_filename(filename)?;
        Ok(self.base_path.join(filename))
    }

    /// Temporary sibling used while an artifact is being written
    fn temp_path(&self, filename: &str) -> PathBuf {
        self.base_path
            .join(format!(".{}.{}.tmp", filename, Uuid::new_v4().simple()))
    }

    async fn write_and_publish(&self, tmp: &Path, path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(tmp).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", tmp.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", tmp.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", tmp.display(), e))
        })?;
        drop(file);

        fs::rename(tmp, path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            ))
        })
    }
}

fn read_error(filename: &str, path: &Path, e: std::io::Error) -> StorageError {
    if e.kind() == ErrorKind::NotFound {
        StorageError::NotFound(filename.to_string())
    } else {
        StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn save(&self, filename: &str, data: Vec<u8>) -> StorageResult<StoredArtifact> {
        let path = self.key_to_path(filename)?;
        let size = data.len();
        let start = std::time::Instant::now();

        // The root may have been removed since startup (e.g. an ephemeral volume).
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let tmp = self.temp_path(filename);
        if let Err(e) = self.write_and_publish(&tmp, &path, &data).await {
            let _ = fs::remove_file(&tmp).await;
            tracing::error!(key = %filename, error = %e, "Local storage write failed");
            return Err(e);
        }

        tracing::info!(
            path = %path.display(),
            key = %filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage save successful"
        );

        Ok(StoredArtifact {
            filename: filename.to_string(),
            directory: self.base_path.clone(),
            content_type: ARTIFACT_CONTENT_TYPE,
            size_bytes: size,
        })
    }

    async fn read(&self, filename: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(filename)?;
        let start = std::time::Instant::now();

        let data = fs::read(&path)
            .await
            .map_err(|e| read_error(filename, &path, e))?;

        tracing::info!(
            path = %path.display(),
            key = %filename,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(data)
    }

    async fn read_stream(&self, filename: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(filename)?;

        let file = fs::File::open(&path)
            .await
            .map_err(|e| read_error(filename, &path, e))?;

        let key = filename.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(key = %key, error = %e, "Local storage stream read error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        tracing::debug!(path = %path.display(), key = %filename, "Local storage stream opened");

        Ok(Box::pin(stream))
    }

    async fn exists(&self, filename: &str) -> StorageResult<bool> {
        let path = self.key_to_path(filename)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, filename: &str) -> StorageResult<()> {
        let path = self.key_to_path(filename)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %filename, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{generate_artifact_name, ArtifactKind};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_save_and_read() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).await.unwrap();

        let data = b"jpeg bytes".to_vec();
        let artifact = storage.save("original_1_u.jpg", data.clone()).await.unwrap();

        assert_eq!(artifact.filename, "original_1_u.jpg");
        assert_eq!(artifact.content_type, "image/jpeg");
        assert_eq!(artifact.size_bytes, data.len());
        assert_eq!(artifact.directory, temp_dir.path());

        let read = storage.read("original_1_u.jpg").await.unwrap();
        assert_eq!(read, data);
    }

    #[tokio::test]
    async fn test_local_storage_leaves_no_temp_files() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).await.unwrap();

        storage.save("a.jpg", vec![1, 2, 3]).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["a.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_local_storage_creates_missing_root_on_save() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("uploads");
        let storage = LocalStorage::new(&root).await.unwrap();

        std::fs::remove_dir_all(&root).unwrap();
        storage.save("b.jpg", vec![9]).await.unwrap();

        assert!(root.join("b.jpg").exists());
    }

    #[tokio::test]
    async fn test_local_storage_not_found() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).await.unwrap();

        assert!(matches!(
            storage.read("missing.jpg").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.read_stream("missing.jpg").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!storage.exists("missing.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_path_traversal_protection() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("root")).await.unwrap();
        std::fs::write(temp_dir.path().join("secret.txt"), b"secret").unwrap();

        assert!(matches!(
            storage.read("../secret.txt").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.save("../escape.jpg", vec![1]).await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.exists("nested/file.jpg").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(!temp_dir.path().join("escape.jpg").exists());
    }

    #[tokio::test]
    async fn test_local_storage_hides_temp_files() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).await.unwrap();
        let temp_name = ".original_1_u.jpg.0b7e2c1d.tmp";
        std::fs::write(temp_dir.path().join(temp_name), b"partial").unwrap();

        assert!(matches!(
            storage.read(temp_name).await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.exists(temp_name).await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_local_storage_delete_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).await.unwrap();

        storage.save("c.jpg", vec![1]).await.unwrap();
        assert!(storage.exists("c.jpg").await.unwrap());

        storage.delete("c.jpg").await.unwrap();
        assert!(!storage.exists("c.jpg").await.unwrap());
        storage.delete("c.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_local_storage_read_stream() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).await.unwrap();

        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        storage.save("big.jpg", data.clone()).await.unwrap();

        let mut stream = storage.read_stream("big.jpg").await.unwrap();
        let mut downloaded = Vec::new();
        while let Some(chunk_result) = stream.next().await {
            downloaded.extend_from_slice(&chunk_result.unwrap());
        }

        assert_eq!(data, downloaded);
    }

    #[tokio::test]
    async fn test_local_storage_concurrent_saves_do_not_collide() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(temp_dir.path()).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..50u8 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                let name = generate_artifact_name(ArtifactKind::Original, Uuid::new_v4());
                storage.save(&name, vec![i; 64]).await.unwrap().filename
            }));
        }

        let mut names = HashSet::new();
        for handle in handles {
            names.insert(handle.await.unwrap());
        }
        assert_eq!(names.len(), 50);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 50);
    }
}
