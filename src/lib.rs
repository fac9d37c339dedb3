// Library crate for Rekindle
// Exports modules for use by the server binary and tests

pub mod config;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{
    create_user, delete_consultation, delete_user, get_consultation, get_profile, get_user,
    list_consultations, list_users, login, predict, predict_for_user, prediction_history,
    profile_statistics, register, statistics, submit_consultation, update_consultation,
    update_profile, update_user, upload_avatar, MAX_AVATAR_BYTES,
};
use crate::middlewares::{auth_middleware, require_admin, require_staff};
use crate::state::AppState;

// Room for multipart boundaries and headers around the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // User management (admin only)
    let admin_routes = Router::new()
        .route("/api/admin/users", post(create_user))
        .route("/api/admin/users/{id}", put(update_user).delete(delete_user))
        .route("/api/admin/predict/{id}", post(predict_for_user))
        .route_layer(middleware::from_fn(require_admin));

    // Read access to users and statistics, consultation management (admin or hr)
    let staff_routes = Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", get(get_user))
        .route("/api/admin/statistics", get(statistics))
        .route("/api/consultation", get(list_consultations))
        .route(
            "/api/consultation/{id}",
            get(get_consultation)
                .put(update_consultation)
                .delete(delete_consultation),
        )
        .route_layer(middleware::from_fn(require_staff));

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        // Predictions
        .route("/api/predict", post(predict))
        .route("/api/predict/history", get(prediction_history))
        // Profile
        .route("/api/profile", get(get_profile).put(update_profile))
        .route(
            "/api/profile/upload-avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES + MULTIPART_OVERHEAD)),
        )
        .route("/api/profile/statistics", get(profile_statistics))
        .merge(admin_routes)
        .merge(staff_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(|| async { "Rekindle API is running" }))
        // Public auth routes
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        // Public employer form
        .route("/api/consultation/submit", post(submit_consultation))
        // Protected routes
        .merge(protected_routes)
        // Uploaded avatars
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
