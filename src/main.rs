use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use rekindle::config::Config;
use rekindle::handlers::{
    AdminPredictionResponse, AuthResponse, AvatarResponse, AvatarUpload, ConsultationEnvelope,
    CreateUserRequest, LoginRequest, MessageResponse, PredictionResponse, RegisterRequest,
    SubmitConsultationRequest, UpdateConsultationRequest, UpdateProfileRequest, UpdateUserRequest,
};
use rekindle::models::{
    CompanySize, CompanyType, ConsultationResponse, ConsultationStatus, ContactSummary, Gender,
    PredictionInput, PredictionRecord, Role, UserResponse, WfhSetup,
};
use rekindle::services::{ensure_admin, RecentPrediction, RiskStatistics, UserStatistics};
use rekindle::state::AppState;
use rekindle::{build_router, handlers};

/// Security scheme for Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::predict::predict,
        handlers::predict::prediction_history,
        handlers::admin::list_users,
        handlers::admin::create_user,
        handlers::admin::get_user,
        handlers::admin::update_user,
        handlers::admin::delete_user,
        handlers::admin::statistics,
        handlers::admin::predict_for_user,
        handlers::consultation::submit_consultation,
        handlers::consultation::list_consultations,
        handlers::consultation::get_consultation,
        handlers::consultation::update_consultation,
        handlers::consultation::delete_consultation,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::profile::upload_avatar,
        handlers::profile::profile_statistics,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserResponse,
        Role,
        MessageResponse,
        PredictionInput,
        CompanyType,
        WfhSetup,
        Gender,
        PredictionRecord,
        PredictionResponse,
        CreateUserRequest,
        UpdateUserRequest,
        AdminPredictionResponse,
        RiskStatistics,
        RecentPrediction,
        SubmitConsultationRequest,
        UpdateConsultationRequest,
        ConsultationEnvelope,
        ConsultationResponse,
        ConsultationStatus,
        CompanySize,
        ContactSummary,
        UpdateProfileRequest,
        AvatarUpload,
        AvatarResponse,
        UserStatistics,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Predictions", description = "Burnout assessments for the current user"),
        (name = "Admin", description = "User management and risk statistics"),
        (name = "Consultations", description = "Employer consultation requests"),
        (name = "Profile", description = "Current user's profile and avatar")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing; LOG_FORMAT=json switches to structured output
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    let addr = config.server_addr();

    // Initialize application state (connects to MongoDB)
    tracing::info!("Connecting to MongoDB...");
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");
    tracing::info!("Database connection established");

    if let Err(e) = ensure_admin(&state).await {
        tracing::error!(error = %e, "Failed to ensure admin account");
    }

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .expect("Server error");
}
