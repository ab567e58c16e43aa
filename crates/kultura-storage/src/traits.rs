//! Storage abstraction trait
//!
//! This module defines the Storage trait that all artifact backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid artifact name: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked artifact contents for streaming retrieval
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// A durably written, immutable artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub filename: String,
    pub directory: PathBuf,
    pub content_type: &'static str,
    pub size_bytes: usize,
}

/// Storage abstraction trait
///
/// Artifacts are addressed by a flat filename. Implementations must never
/// resolve a name outside their root and must never update an artifact in place.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `filename`. The file becomes visible only once fully written.
    async fn save(&self, filename: &str, data: Vec<u8>) -> StorageResult<StoredArtifact>;

    /// Read a whole artifact into memory
    async fn read(&self, filename: &str) -> StorageResult<Vec<u8>>;

    /// Read an artifact as a stream of chunks
    async fn read_stream(&self, filename: &str) -> StorageResult<ByteStream>;

    /// Check if an artifact exists
    async fn exists(&self, filename: &str) -> StorageResult<bool>;

    /// Remove an artifact. Only used to roll back a failed processing run.
    async fn delete(&self, filename: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
