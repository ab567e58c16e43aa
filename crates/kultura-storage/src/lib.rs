//! KulturaView Artifact Store
//!
//! This crate provides the storage abstraction for processed-preview artifacts
//! and its local filesystem implementation.
//!
//! # Artifact names
//!
//! Every artifact lives directly under the configured root directory; there is
//! no nested layout. Names are `{kind}_{unix_millis}_{user_id}_{random8}.jpg`
//! and are generated by the `naming` module. Any name that is not a single
//! path component made of `[A-Za-z0-9._-]` is rejected with `InvalidKey`.

pub mod factory;
pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use kultura_core::StorageBackend;
pub use local::LocalStorage;
pub use naming::{generate_artifact_name, validate_filename, ArtifactKind};
pub use traits::{ByteStream, Storage, StorageError, StorageResult, StoredArtifact};
