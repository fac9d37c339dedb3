use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use rekindle::build_router;
use rekindle::config::Config;
use rekindle::error::{AppError, AppResult};
use rekindle::models::PredictionInput;
use rekindle::repositories::{InMemoryConsultationStore, InMemoryUserStore};
use rekindle::services::BurnoutScorer;
use rekindle::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        mongodb_uri: "mongodb://localhost:27017".to_string(),
        mongodb_database: "rekindle_test".to_string(),
        jwt_secret: "test-jwt-secret-that-is-at-least-32-characters-long".to_string(),
        jwt_expiration_hours: 24,
        // Minimum bcrypt cost
        bcrypt_cost: 4,
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir: std::env::temp_dir().join(format!("rekindle-test-{}", uuid::Uuid::new_v4())),
        prediction_service_url: "http://127.0.0.1:9".to_string(),
        prediction_timeout_secs: 1,
        admin_email: None,
        admin_password: None,
    }
}

/// Scoring service stand-in
pub enum StubScorer {
    Fixed(f64),
    Failing(String),
}

#[async_trait]
impl BurnoutScorer for StubScorer {
    async fn score(&self, _input: &PredictionInput) -> AppResult<f64> {
        match self {
            StubScorer::Fixed(score) => Ok(*score),
            StubScorer::Failing(message) => Err(AppError::Upstream(message.clone())),
        }
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application with a scorer that always returns 42.5
    pub async fn new() -> Self {
        Self::with_scorer(StubScorer::Fixed(42.5)).await
    }

    /// Create a test application around the given scorer.
    /// In-memory stores avoid a MongoDB dependency in tests.
    pub async fn with_scorer(scorer: StubScorer) -> Self {
        let state = AppState::with_backends(
            test_config(),
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryConsultationStore::new()),
            Arc::new(scorer),
        );

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }
}
