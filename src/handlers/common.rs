use axum::{
    extract::{FromRequest, Request},
    Json,
};
use bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Plain acknowledgement body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `Json` body extractor whose rejections (bad syntax, wrong types, unknown
/// enum variants, missing content type) come back as `AppError::Validation`
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Parse a path id, rejecting anything that is not a 24-char hex ObjectId
pub fn parse_object_id(raw: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid id: {}", raw)))
}

/// Trimmed value of a required text field
pub fn validate_required(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value of an optional text field; blank counts as absent
pub fn validate_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_email(value: &str) -> AppResult<String> {
    let email = crate::models::normalize_email(value);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::Validation("Email is invalid".to_string())),
    }
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
