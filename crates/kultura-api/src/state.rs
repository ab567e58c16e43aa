//! Application state shared by all handlers

use std::time::Instant;

use kultura_core::Config;
use kultura_processing::ProcessingPipeline;

use crate::auth::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: ProcessingPipeline,
    pub jwt: JwtKeys,
    /// Process start, reported as uptime by `/health`
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, pipeline: ProcessingPipeline) -> Self {
        let jwt = JwtKeys::new(config.jwt_secret());
        Self {
            config,
            pipeline,
            jwt,
            started_at: Instant::now(),
        }
    }
}
