//! Configuration module
//!
//! Configuration structures for the preview service: server, database,
//! authentication, artifact storage and image-processing settings.

use std::env;

use crate::constants::{
    DEFAULT_JPEG_QUALITY, DEFAULT_WATERMARK_TEXT, MAX_IMAGE_DIMENSION, MAX_IMAGE_PIXELS,
    MAX_UPLOAD_SIZE_BYTES,
};
use crate::procedure_policy::ProcedurePolicy;
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";
const PRODUCTION_UPLOADS_DIR: &str = "/tmp/uploads";
const DEVELOPMENT_UPLOADS_DIR: &str = "./uploads";

/// Console log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Base configuration for the HTTP service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub http_concurrency_limit: usize,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Preview service configuration
#[derive(Clone, Debug)]
pub struct PreviewConfig {
    pub base: BaseConfig,
    /// Postgres URL. `None` selects the in-memory repository (development only).
    pub database_url: Option<String>,
    pub storage_backend: StorageBackend,
    /// Artifact root, resolved once at startup.
    pub uploads_dir: String,
    pub max_upload_size_bytes: usize,
    /// Decoded width and height bound, each
    pub max_image_dimension: u32,
    /// Decoded `width * height` bound
    pub max_image_pixels: u64,
    pub procedure_policy: ProcedurePolicy,
    pub watermark_text: String,
    pub jpeg_quality: u8,
    pub frontend_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PreviewConfig>);

impl Config {
    fn as_preview(&self) -> &PreviewConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_preview().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PreviewConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_preview().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_preview().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_preview().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_preview().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_preview().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_preview().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_preview().base.db_timeout_seconds
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_preview().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_preview().base.log_format
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_preview().database_url.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_preview().storage_backend
    }

    pub fn uploads_dir(&self) -> &str {
        &self.as_preview().uploads_dir
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_preview().max_upload_size_bytes
    }

    pub fn max_image_dimension(&self) -> u32 {
        self.as_preview().max_image_dimension
    }

    pub fn max_image_pixels(&self) -> u64 {
        self.as_preview().max_image_pixels
    }

    pub fn procedure_policy(&self) -> ProcedurePolicy {
        self.as_preview().procedure_policy
    }

    pub fn watermark_text(&self) -> &str {
        &self.as_preview().watermark_text
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.as_preview().jpeg_quality
    }

    pub fn frontend_url(&self) -> Option<&str> {
        self.as_preview().frontend_url.as_deref()
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl PreviewConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());
        let is_production = is_production_name(&environment);

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            environment,
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Compact,
            },
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let procedure_policy = match lookup("PROCEDURE_POLICY") {
            Some(s) => s.parse::<ProcedurePolicy>()?,
            None => ProcedurePolicy::default(),
        };

        let uploads_dir = lookup("UPLOADS_DIR").unwrap_or_else(|| {
            if is_production {
                PRODUCTION_UPLOADS_DIR.to_string()
            } else {
                DEVELOPMENT_UPLOADS_DIR.to_string()
            }
        });

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if is_production && database_url.is_none() {
            return Err(anyhow::anyhow!("DATABASE_URL must be set in production"));
        }

        Ok(PreviewConfig {
            base,
            database_url,
            storage_backend,
            uploads_dir,
            max_upload_size_bytes: lookup("MAX_UPLOAD_SIZE_BYTES")
                .unwrap_or_else(|| MAX_UPLOAD_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_UPLOAD_SIZE_BYTES),
            max_image_dimension: lookup("MAX_IMAGE_DIMENSION")
                .unwrap_or_else(|| MAX_IMAGE_DIMENSION.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_IMAGE_DIMENSION must be a positive integer"))?,
            max_image_pixels: lookup("MAX_IMAGE_PIXELS")
                .unwrap_or_else(|| MAX_IMAGE_PIXELS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_IMAGE_PIXELS must be a positive integer"))?,
            procedure_policy,
            watermark_text: lookup("WATERMARK_TEXT")
                .unwrap_or_else(|| DEFAULT_WATERMARK_TEXT.to_string()),
            jpeg_quality: lookup("JPEG_QUALITY")
                .unwrap_or_else(|| DEFAULT_JPEG_QUALITY.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("JPEG_QUALITY must be a number between 1 and 100"))?,
            frontend_url: lookup("FRONTEND_URL").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 16 && is_production_name(&self.base.environment) {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 16 characters in production"
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!(
                "JPEG_QUALITY must be between 1 and 100, got {}",
                self.jpeg_quality
            ));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES cannot be 0"));
        }
        if self.max_image_dimension == 0 || self.max_image_pixels == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_DIMENSION and MAX_IMAGE_PIXELS must be greater than 0"
            ));
        }
        if self.uploads_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOADS_DIR cannot be empty"));
        }
        Ok(())
    }
}
