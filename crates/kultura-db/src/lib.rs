//! KulturaView Database Layer
//!
//! Persistence for provenance records: the `ImageProcessRepository` trait with
//! a Postgres implementation and an in-memory one for tests and local runs.

pub mod db;

pub use db::image_process::{ImageProcessRepository, PgImageProcessRepository};
pub use db::memory::InMemoryImageProcessRepository;
pub use db::{run_migrations, MIGRATOR};
