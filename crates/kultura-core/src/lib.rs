//! KulturaView Core Library
//!
//! This crate provides core domain models, error types and configuration
//! that are shared across all KulturaView components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod procedure_policy;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, LogFormat, PreviewConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use procedure_policy::ProcedurePolicy;
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in kultura-storage
