pub mod admin;
pub mod auth;
pub mod common;
pub mod consultation;
pub mod predict;
pub mod profile;

pub use admin::{
    create_user, delete_user, get_user, list_users, predict_for_user, statistics, update_user,
    AdminPredictionResponse, CreateUserRequest, UpdateUserRequest,
};
pub use auth::{login, register, AuthResponse, LoginRequest, RegisterRequest};
pub use common::{validate_optional, validate_required, MessageResponse};
pub use consultation::{
    delete_consultation, get_consultation, list_consultations, submit_consultation,
    update_consultation, ConsultationEnvelope, SubmitConsultationRequest,
    UpdateConsultationRequest,
};
pub use predict::{predict, prediction_history, PredictionResponse};
pub use profile::{
    get_profile, profile_statistics, update_profile, upload_avatar, AvatarResponse, AvatarUpload,
    UpdateProfileRequest, MAX_AVATAR_BYTES,
};
