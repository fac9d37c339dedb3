use std::sync::Arc;
use std::time::Duration;

use mongodb::Client as MongoClient;

use crate::config::Config;
use crate::repositories::{ConsultationRepository, ConsultationStore, UserRepository, UserStore};
use crate::services::{BurnoutScorer, HttpScorer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub consultations: Arc<dyn ConsultationStore>,
    /// Client for the external scoring service
    pub scorer: Arc<dyn BurnoutScorer>,
}

impl AppState {
    /// Create a new AppState by connecting to MongoDB
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let mongo_client = MongoClient::with_uri_str(&config.mongodb_uri)
            .await
            .map_err(|e| AppStateError::Mongo(e.to_string()))?;
        let db = mongo_client.database(&config.mongodb_database);

        let users = UserRepository::new(&db);
        users
            .ensure_indexes()
            .await
            .map_err(|e| AppStateError::Mongo(e.to_string()))?;

        let consultations = ConsultationRepository::new(&db);

        let scorer = HttpScorer::new(
            &config.prediction_service_url,
            Duration::from_secs(config.prediction_timeout_secs),
        )
        .map_err(|e| AppStateError::HttpClient(e.to_string()))?;

        Ok(Self::with_backends(
            config,
            Arc::new(users),
            Arc::new(consultations),
            Arc::new(scorer),
        ))
    }

    /// Create AppState with custom backends (for testing)
    pub fn with_backends(
        config: Config,
        users: Arc<dyn UserStore>,
        consultations: Arc<dyn ConsultationStore>,
        scorer: Arc<dyn BurnoutScorer>,
    ) -> Self {
        Self {
            config,
            users,
            consultations,
            scorer,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("MongoDB connection error: {0}")]
    Mongo(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
