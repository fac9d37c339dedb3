use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::handlers::common::{
    parse_object_id, validate_email, validate_optional, validate_password, validate_required,
    MessageResponse, ValidJson,
};
use crate::handlers::predict::score_and_record;
use crate::middlewares::AuthUser;
use crate::models::{CreateUser, PredictionInput, Role, User, UserChanges, UserFilter, UserResponse};
use crate::services::{AuthService, RiskStatistics};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    /// `user` (default), `hr`, `admin`, or `all`
    pub role: Option<String>,
}

impl ListUsersParams {
    fn into_filter(self) -> AppResult<UserFilter> {
        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => Some(Role::User),
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(r.parse::<Role>().map_err(AppError::Validation)?),
        };

        Ok(UserFilter {
            role,
            search: validate_optional(self.search),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// New password; hashed before storage
    pub password: Option<String>,
    pub role: Option<Role>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPredictionResponse {
    pub prediction: f64,
    pub user_id: String,
    pub user_name: String,
}

// ============ Handlers ============

/// List users, newest first
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Matching users", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff role required")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let filter = params.into_filter()?;
    let users = state.users.list(&filter).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user account with any role
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Email already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn create_user(
    admin: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let name = validate_required("Name", &payload.name)?;
    let email = validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let password_hash = AuthService::hash_password(&payload.password, state.config.bcrypt_cost)?;

    let user = User::new(
        CreateUser {
            name,
            email,
            role: payload.role.unwrap_or_default(),
            bio: payload.bio,
            location: payload.location,
            company: payload.company,
            position: payload.position,
        },
        password_hash,
    );
    let user = state.users.insert(user).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, "Admin created user");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a user with their prediction history
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.find_by_id(parse_object_id(&id)?).await?;
    Ok(Json(user.into()))
}

/// Update a user's profile, role, or password
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn update_user(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_object_id(&id)?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(AuthService::hash_password(password, state.config.bcrypt_cost)?)
        }
        None => None,
    };

    let changes = UserChanges {
        name: validate_optional(payload.name),
        email: validate_optional(payload.email)
            .map(|e| validate_email(&e))
            .transpose()?,
        password_hash,
        role: payload.role,
        bio: payload.bio,
        location: payload.location,
        company: payload.company,
        position: payload.position,
        avatar: None,
    };

    let user = state.users.update(id, &changes).await?;
    tracing::info!(admin_id = %admin.id, user_id = %id, "Admin updated user");
    Ok(Json(user.into()))
}

/// Permanently delete a user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn delete_user(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_object_id(&id)?;
    state.users.delete(id).await?;

    tracing::info!(admin_id = %admin.id, user_id = %id, "Admin deleted user");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Burnout risk overview across all regular users
#[utoipa::path(
    get,
    path = "/api/admin/statistics",
    responses(
        (status = 200, description = "Risk statistics", body = RiskStatistics),
        (status = 403, description = "Staff role required")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn statistics(State(state): State<AppState>) -> AppResult<Json<RiskStatistics>> {
    let filter = UserFilter {
        role: Some(Role::User),
        search: None,
    };
    let users = state.users.list(&filter).await?;
    Ok(Json(RiskStatistics::from_users(&users)))
}

/// Make a burnout prediction on behalf of a user
#[utoipa::path(
    post,
    path = "/api/admin/predict/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = PredictionInput,
    responses(
        (status = 200, description = "Prediction saved", body = AdminPredictionResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Prediction service failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn predict_for_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<PredictionInput>,
) -> AppResult<Json<AdminPredictionResponse>> {
    let user = state.users.find_by_id(parse_object_id(&id)?).await?;
    let prediction = score_and_record(&state, user.id, &payload).await?;

    Ok(Json(AdminPredictionResponse {
        prediction,
        user_id: user.id.to_hex(),
        user_name: user.name,
    }))
}
