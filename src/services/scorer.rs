use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::PredictionInput;

/// Source of burnout scores
#[async_trait]
pub trait BurnoutScorer: Send + Sync {
    /// Score one set of survey answers (0-100)
    async fn score(&self, input: &PredictionInput) -> AppResult<f64>;
}

/// Body returned by the scoring service, on success or failure
#[derive(Debug, Deserialize)]
struct ScoreBody {
    prediction: Option<f64>,
    error: Option<String>,
}

/// Client for the external ML scoring service
pub struct HttpScorer {
    client: Client,
    endpoint: String,
}

impl HttpScorer {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BurnoutScorer for HttpScorer {
    async fn score(&self, input: &PredictionInput) -> AppResult<f64> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(input)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        let body = serde_json::from_str::<ScoreBody>(&text).ok();

        if !status.is_success() {
            let message = body
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("Prediction service returned {}", status));
            return Err(AppError::Upstream(message));
        }

        match body.and_then(|b| b.prediction) {
            Some(score) if score.is_finite() => {
                tracing::debug!(score, "Prediction service responded");
                Ok(score)
            }
            _ => Err(AppError::Upstream(
                "Prediction service returned no prediction".to_string(),
            )),
        }
    }
}
