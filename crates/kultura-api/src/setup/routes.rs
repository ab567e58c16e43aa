//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use kultura_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Slack on top of the image limit for multipart framing and the text fields.
/// The exact image limit is enforced by the upload validator.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let image_routes = Router::new()
        .route("/process", post(handlers::image_process::process_image))
        .route("/file/{filename}", get(handlers::image_file::get_image_file))
        .route("/history", get(handlers::image_history::get_image_history))
        .layer(DefaultBodyLimit::max(
            config.max_upload_size_bytes() + MULTIPART_OVERHEAD_BYTES,
        ));

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api", get(handlers::health::api_info))
        .nest("/api/image", image_routes)
        .fallback(handlers::health::not_found)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Allowed origins: `CORS_ORIGINS` plus `FRONTEND_URL` when set
fn cors_origins(config: &Config) -> Vec<String> {
    let mut origins: Vec<String> = config.cors_origins().to_vec();
    if let Some(frontend) = config.frontend_url() {
        if !origins.iter().any(|o| o == frontend) {
            origins.push(frontend.to_string());
        }
    }
    origins
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let origins = cors_origins(config);

    let cors = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kultura_core::PreviewConfig;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let preview = PreviewConfig::from_lookup(|key| {
            pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        Config(Box::new(preview))
    }

    #[test]
    fn test_cors_origins_include_frontend_url() {
        let cfg = config(&[
            ("JWT_SECRET", "test-secret-at-least-16-chars"),
            ("CORS_ORIGINS", "http://localhost:3000"),
            ("FRONTEND_URL", "https://app.kulturaview.test"),
        ]);
        assert_eq!(
            cors_origins(&cfg),
            vec![
                "http://localhost:3000".to_string(),
                "https://app.kulturaview.test".to_string()
            ]
        );
    }

    #[test]
    fn test_cors_frontend_url_not_duplicated() {
        let cfg = config(&[
            ("JWT_SECRET", "test-secret-at-least-16-chars"),
            ("CORS_ORIGINS", "http://localhost:3000"),
            ("FRONTEND_URL", "http://localhost:3000"),
        ]);
        assert_eq!(cors_origins(&cfg).len(), 1);
    }

    #[test]
    fn test_invalid_cors_origin_rejected() {
        let cfg = config(&[
            ("JWT_SECRET", "test-secret-at-least-16-chars"),
            ("CORS_ORIGINS", "http://bad\norigin"),
        ]);
        assert!(setup_cors(&cfg).is_err());
    }
}
