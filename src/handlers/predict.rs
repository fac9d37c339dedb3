use axum::{extract::State, Json};
use bson::oid::ObjectId;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::common::ValidJson;
use crate::middlewares::AuthUser;
use crate::models::{BurnoutPrediction, PredictionInput, PredictionRecord};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionResponse {
    pub prediction: f64,
    pub message: String,
}

// ============ Handlers ============

/// Score the answers and append the result to the user's history.
/// Nothing is stored when scoring fails.
pub(crate) async fn score_and_record(
    state: &AppState,
    user_id: ObjectId,
    input: &PredictionInput,
) -> AppResult<f64> {
    input.validate()?;

    let score = state.scorer.score(input).await?;
    state
        .users
        .push_prediction(user_id, BurnoutPrediction::new(score, input))
        .await?;

    tracing::info!(user_id = %user_id, score, "Prediction saved");
    Ok(score)
}

/// Make and save a burnout prediction for the current user
#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictionInput,
    responses(
        (status = 200, description = "Prediction saved", body = PredictionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Prediction service failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Predictions"
)]
pub async fn predict(
    user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<PredictionInput>,
) -> AppResult<Json<PredictionResponse>> {
    let prediction = score_and_record(&state, user.id, &payload).await?;

    Ok(Json(PredictionResponse {
        prediction,
        message: "Prediction saved successfully".to_string(),
    }))
}

/// Get the current user's prediction history
#[utoipa::path(
    get,
    path = "/api/predict/history",
    responses(
        (status = 200, description = "Predictions in submission order", body = [PredictionRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Predictions"
)]
pub async fn prediction_history(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PredictionRecord>>> {
    let user = state.users.find_by_id(user.id).await?;

    Ok(Json(
        user.burnout_predictions
            .into_iter()
            .map(PredictionRecord::from)
            .collect(),
    ))
}
