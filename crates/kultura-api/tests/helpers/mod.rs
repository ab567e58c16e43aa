//! Test helpers: build AppState and router for integration tests.
//!
//! Persistence is the in-memory repository and artifacts go to a temp
//! directory, so these tests need neither Docker nor a database.

use std::io::Cursor;
use std::sync::Arc;

use axum_test::TestServer;
use chrono::Duration;
use image::{ImageFormat, Rgb, RgbImage};
use kultura_api::auth::{JwtKeys, Role};
use kultura_api::setup::{build_pipeline, routes};
use kultura_api::state::AppState;
use kultura_core::{Config, PreviewConfig};
use kultura_db::{ImageProcessRepository, InMemoryImageProcessRepository};
use kultura_storage::{LocalStorage, Storage};
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";

/// Test application: server plus the resources it owns
pub struct TestApp {
    pub server: TestServer,
    pub keys: JwtKeys,
    pub repository: Arc<InMemoryImageProcessRepository>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid, role: Role) -> String {
        self.keys
            .issue_token(user_id, role, Duration::hours(1))
            .expect("Failed to issue token")
    }

    pub fn bearer(&self, user_id: Uuid, role: Role) -> String {
        format!("Bearer {}", self.token_for(user_id, role))
    }

    /// Number of files currently in the artifact root
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path())
            .expect("Failed to read uploads dir")
            .count()
    }
}

pub fn test_config(uploads_dir: &str) -> Config {
    let pairs = [
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("UPLOADS_DIR", uploads_dir),
        ("ENVIRONMENT", "test"),
    ];
    let preview = PreviewConfig::from_lookup(|key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .expect("Failed to build test config");
    Config(Box::new(preview))
}

/// Setup test app with in-memory persistence and temp-dir storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let uploads_dir = temp_dir
        .path()
        .to_str()
        .expect("temp dir path is not UTF-8")
        .to_string();
    let config = test_config(&uploads_dir);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );
    let repository = Arc::new(InMemoryImageProcessRepository::new());

    let pipeline = build_pipeline(
        &config,
        storage,
        repository.clone() as Arc<dyn ImageProcessRepository>,
    );
    let state = Arc::new(AppState::new(config.clone(), pipeline));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        keys: JwtKeys::new(TEST_JWT_SECRET),
        repository,
        temp_dir,
    }
}

/// A small textured PNG so sharpening and blurring have something to act on
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let checker = ((x / 4) + (y / 4)) % 2 == 0;
        if checker {
            Rgb([200, 120, 110])
        } else {
            Rgb([90, 60, 150])
        }
    });

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buf.into_inner()
}
