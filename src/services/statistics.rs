use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{format_datetime, BurnoutPrediction, PredictionRecord, User};

pub const HIGH_RISK_THRESHOLD: f64 = 70.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;
const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentPrediction {
    pub user_id: String,
    pub user_name: String,
    pub prediction: f64,
    pub date: String,
}

/// Organisation-wide risk overview
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskStatistics {
    pub total_users: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub average_burnout_score: f64,
    pub recent_predictions: Vec<RecentPrediction>,
}

impl RiskStatistics {
    /// Aggregate over each user's latest prediction. Users without
    /// predictions count towards `total_users` only.
    pub fn from_users(users: &[User]) -> Self {
        let mut stats = RiskStatistics {
            total_users: users.len(),
            high_risk_count: 0,
            medium_risk_count: 0,
            low_risk_count: 0,
            average_burnout_score: 0.0,
            recent_predictions: Vec::new(),
        };

        let mut latest: Vec<(&User, &BurnoutPrediction)> = users
            .iter()
            .filter_map(|u| u.latest_prediction().map(|p| (u, p)))
            .collect();

        for (_, prediction) in &latest {
            match RiskLevel::from_score(prediction.prediction) {
                RiskLevel::High => stats.high_risk_count += 1,
                RiskLevel::Medium => stats.medium_risk_count += 1,
                RiskLevel::Low => stats.low_risk_count += 1,
            }
        }

        if !latest.is_empty() {
            let total: f64 = latest.iter().map(|(_, p)| p.prediction).sum();
            stats.average_burnout_score = round2(total / latest.len() as f64);
        }

        latest.sort_by(|a, b| b.1.date.cmp(&a.1.date));
        stats.recent_predictions = latest
            .into_iter()
            .take(RECENT_LIMIT)
            .map(|(user, prediction)| RecentPrediction {
                user_id: user.id.to_hex(),
                user_name: user.name.clone(),
                prediction: prediction.prediction,
                date: format_datetime(prediction.date),
            })
            .collect();

        stats
    }
}

/// A single user's own history summary
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_assessments: usize,
    pub latest_score: Option<f64>,
    pub average_score: Option<f64>,
    pub assessment_history: Vec<PredictionRecord>,
}

impl UserStatistics {
    pub fn from_user(user: &User) -> Self {
        let predictions = &user.burnout_predictions;
        let average_score = if predictions.is_empty() {
            None
        } else {
            let total: f64 = predictions.iter().map(|p| p.prediction).sum();
            Some(total / predictions.len() as f64)
        };

        let skip = predictions.len().saturating_sub(RECENT_LIMIT);

        UserStatistics {
            total_assessments: predictions.len(),
            latest_score: user.latest_prediction().map(|p| p.prediction),
            average_score,
            assessment_history: predictions
                .iter()
                .skip(skip)
                .cloned()
                .map(PredictionRecord::from)
                .collect(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
