use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::common::{validate_email, validate_optional, ValidJson};
use crate::middlewares::AuthUser;
use crate::models::{UserChanges, UserResponse};
use crate::services::UserStatistics;
use crate::state::AppState;

pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
const AVATAR_FIELD: &str = "avatar";

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// Ignored when blank
    pub name: Option<String>,
    /// Ignored when blank
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub message: String,
    /// Public path under `/uploads`
    pub avatar: String,
}

/// Multipart body for avatar uploads
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AvatarUpload {
    #[schema(format = Binary)]
    avatar: String,
}

// ============ Handlers ============

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.find_by_id(user.id).await?;
    Ok(Json(user.into()))
}

/// Update the current user's profile fields
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let changes = UserChanges {
        name: validate_optional(payload.name),
        email: validate_optional(payload.email)
            .map(|e| validate_email(&e))
            .transpose()?,
        bio: payload.bio,
        location: payload.location,
        company: payload.company,
        position: payload.position,
        ..Default::default()
    };

    let updated = state.users.update(user.id, &changes).await?;
    tracing::debug!(user_id = %user.id, "Profile updated");
    Ok(Json(updated.into()))
}

/// Upload a profile picture (multipart field `avatar`, images up to 5 MiB)
#[utoipa::path(
    post,
    path = "/api/profile/upload-avatar",
    request_body(content = AvatarUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Missing, oversized, or non-image file"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn upload_avatar(
    user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AvatarResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::Validation("Only image files are allowed".to_string()));
        }

        let extension = field
            .file_name()
            .and_then(|name| FsPath::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e)))?;
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(AppError::Validation("File too large (max 5MB)".to_string()));
        }

        upload = Some((extension, bytes));
        break;
    }

    let (extension, bytes) =
        upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let dir = state.config.avatar_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;

    let file_name = format!(
        "profile-{}-{}{}",
        bson::DateTime::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple(),
        extension
    );
    tokio::fs::write(dir.join(&file_name), &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store avatar: {}", e)))?;

    let avatar = format!("/uploads/profiles/{}", file_name);
    let changes = UserChanges {
        avatar: Some(avatar.clone()),
        ..Default::default()
    };
    state.users.update(user.id, &changes).await?;

    tracing::info!(user_id = %user.id, file = %file_name, size = bytes.len(), "Avatar uploaded");
    Ok(Json(AvatarResponse {
        message: "Avatar uploaded successfully".to_string(),
        avatar,
    }))
}

/// Summary of the current user's own assessments
#[utoipa::path(
    get,
    path = "/api/profile/statistics",
    responses(
        (status = 200, description = "Assessment summary", body = UserStatistics),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn profile_statistics(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserStatistics>> {
    let user = state.users.find_by_id(user.id).await?;
    Ok(Json(UserStatistics::from_user(&user)))
}
