use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::format_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompanyType {
    Service,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WfhSetup {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
}

/// Survey answers sent to the scoring service. Field names are the
/// service's wire contract.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionInput {
    /// 1 = entry level, 2 = mid level, 3 = senior level
    pub designation: i32,
    /// Percentage of working hours allocated, 0-100
    pub resource_allocation: f64,
    /// Self-reported fatigue, 0-10
    pub mental_fatigue_score: f64,
    pub company_type: CompanyType,
    pub wfh_setup_available: WfhSetup,
    pub gender: Gender,
}

impl PredictionInput {
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=3).contains(&self.designation) {
            return Err(AppError::Validation(
                "designation must be between 1 and 3".to_string(),
            ));
        }
        if !self.resource_allocation.is_finite() || !(0.0..=100.0).contains(&self.resource_allocation)
        {
            return Err(AppError::Validation(
                "resource_allocation must be between 0 and 100".to_string(),
            ));
        }
        if !self.mental_fatigue_score.is_finite()
            || !(0.0..=10.0).contains(&self.mental_fatigue_score)
        {
            return Err(AppError::Validation(
                "mental_fatigue_score must be between 0 and 10".to_string(),
            ));
        }
        Ok(())
    }
}

/// A scored prediction as embedded in the user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutPrediction {
    pub prediction: f64,
    pub date: bson::DateTime,
    pub designation: i32,
    pub resource_allocation: f64,
    pub mental_fatigue_score: f64,
    pub company_type: CompanyType,
    pub wfh_setup_available: WfhSetup,
    pub gender: Gender,
}

impl BurnoutPrediction {
    /// Record a score together with the inputs that produced it
    pub fn new(prediction: f64, input: &PredictionInput) -> Self {
        Self {
            prediction,
            date: bson::DateTime::now(),
            designation: input.designation,
            resource_allocation: input.resource_allocation,
            mental_fatigue_score: input.mental_fatigue_score,
            company_type: input.company_type,
            wfh_setup_available: input.wfh_setup_available,
            gender: input.gender,
        }
    }
}

/// Prediction as returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub prediction: f64,
    pub date: String,
    pub designation: i32,
    pub resource_allocation: f64,
    pub mental_fatigue_score: f64,
    pub company_type: CompanyType,
    pub wfh_setup_available: WfhSetup,
    pub gender: Gender,
}

impl From<BurnoutPrediction> for PredictionRecord {
    fn from(p: BurnoutPrediction) -> Self {
        Self {
            prediction: p.prediction,
            date: format_datetime(p.date),
            designation: p.designation,
            resource_allocation: p.resource_allocation,
            mental_fatigue_score: p.mental_fatigue_score,
            company_type: p.company_type,
            wfh_setup_available: p.wfh_setup_available,
            gender: p.gender,
        }
    }
}
