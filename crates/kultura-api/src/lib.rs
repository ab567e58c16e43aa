//! KulturaView API Library
//!
//! HTTP handlers, authentication and application setup for the preview service.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
