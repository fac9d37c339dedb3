mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use rekindle::models::Role;
use rekindle::services::AuthService;
use serde_json::json;

use common::{Factory, TestApp};

// 1x1 transparent PNG
const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

#[tokio::test]
async fn test_get_profile() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let response = app
        .server
        .get("/api/profile")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], auth.user_id.to_hex());
    assert_eq!(body["email"], auth.email);
    assert_eq!(body["avatar"], "");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let response = app
        .server
        .put("/api/profile")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "name": "Updated Name",
            "bio": "Runner",
            "location": "Lisbon",
            "company": "Acme",
            "position": "Engineer"
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Updated Name");
    assert_eq!(body["bio"], "Runner");
    assert_eq!(body["location"], "Lisbon");
    assert_eq!(body["company"], "Acme");
    assert_eq!(body["position"], "Engineer");
    assert_eq!(body["email"], auth.email);
}

#[tokio::test]
async fn test_update_profile_blank_name_is_ignored() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let user = factory
        .create_user_with("Keep Me", "keep@example.com", Role::User)
        .await;
    let token = AuthService::generate_token(user.id, Role::User, &app.state.config).unwrap();

    let response = app
        .server
        .put("/api/profile")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "", "email": "  ", "bio": "" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Keep Me");
    assert_eq!(body["email"], "keep@example.com");
    assert_eq!(body["bio"], "");
}

#[tokio::test]
async fn test_update_profile_email_conflict() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let first = factory.create_user(Role::User).await;
    let second = factory.create_user(Role::User).await;

    let response = app
        .server
        .put("/api/profile")
        .add_header("Authorization", second.auth_header())
        .json(&json!({ "email": first.email }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_profile_cannot_change_role() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let response = app
        .server
        .put("/api/profile")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({ "role": "admin", "name": "Still User" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn test_upload_avatar() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let form = MultipartForm::new().add_part(
        "avatar",
        Part::bytes(PNG_PIXEL.to_vec())
            .file_name("Me.PNG")
            .mime_type("image/png"),
    );

    let response = app
        .server
        .post("/api/profile/upload-avatar")
        .add_header("Authorization", auth.auth_header())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Avatar uploaded successfully");

    let avatar = body["avatar"].as_str().unwrap();
    assert!(avatar.starts_with("/uploads/profiles/profile-"));
    assert!(avatar.ends_with(".png"));

    // Stored on disk and on the user
    let file_name = avatar.trim_start_matches("/uploads/profiles/");
    let stored = std::fs::read(app.state.config.avatar_dir().join(file_name)).unwrap();
    assert_eq!(stored, PNG_PIXEL);

    let user = app.state.users.find_by_id(auth.user_id).await.unwrap();
    assert_eq!(user.avatar, avatar);

    // Served statically
    let response = app.server.get(avatar).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.as_bytes().as_ref(), PNG_PIXEL);
}

#[tokio::test]
async fn test_upload_avatar_rejects_non_image() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let form = MultipartForm::new().add_part(
        "avatar",
        Part::bytes(b"not an image".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );

    let response = app
        .server
        .post("/api/profile/upload-avatar")
        .add_header("Authorization", auth.auth_header())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let user = app.state.users.find_by_id(auth.user_id).await.unwrap();
    assert!(user.avatar.is_empty());
}

#[tokio::test]
async fn test_upload_avatar_rejects_oversized() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let form = MultipartForm::new().add_part(
        "avatar",
        Part::bytes(vec![0u8; 5 * 1024 * 1024 + 1])
            .file_name("huge.png")
            .mime_type("image/png"),
    );

    let response = app
        .server
        .post("/api/profile/upload-avatar")
        .add_header("Authorization", auth.auth_header())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["details"], "File too large (max 5MB)");

    let user = app.state.users.find_by_id(auth.user_id).await.unwrap();
    assert!(user.avatar.is_empty());

    let written = std::fs::read_dir(app.state.config.avatar_dir())
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(written, 0);
}

#[tokio::test]
async fn test_upload_avatar_missing_file() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let form = MultipartForm::new().add_text("caption", "no file here");

    let response = app
        .server
        .post("/api/profile/upload-avatar")
        .add_header("Authorization", auth.auth_header())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["details"], "No file uploaded");
}

#[tokio::test]
async fn test_profile_statistics() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let user = factory
        .create_user_with_predictions("Stat", &[20.0, 40.0, 90.0])
        .await;
    let token = AuthService::generate_token(user.id, Role::User, &app.state.config).unwrap();

    let response = app
        .server
        .get("/api/profile/statistics")
        .add_header("Authorization", format!("Bearer {}", token))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["totalAssessments"], 3);
    assert_eq!(body["latestScore"].as_f64().unwrap(), 90.0);
    assert_eq!(body["averageScore"].as_f64().unwrap(), 50.0);
    assert_eq!(body["assessmentHistory"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_profile_statistics_without_history() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user(Role::User).await;

    let response = app
        .server
        .get("/api/profile/statistics")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["totalAssessments"], 0);
    assert!(body["latestScore"].is_null());
    assert!(body["averageScore"].is_null());
}
