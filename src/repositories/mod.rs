pub mod consultation;
pub mod memory;
pub mod user;

pub use consultation::ConsultationRepository;
pub use memory::{InMemoryConsultationStore, InMemoryUserStore};
pub use user::UserRepository;

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::error::AppResult;
use crate::models::{
    BurnoutPrediction, Consultation, ConsultationChanges, ConsultationFilter, User, UserChanges,
    UserFilter,
};

/// User storage backend
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; fails with `Conflict` if the email is taken
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: ObjectId) -> AppResult<User>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users matching the filter, newest first
    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>>;

    /// Apply a partial update and return the updated document
    async fn update(&self, id: ObjectId, changes: &UserChanges) -> AppResult<User>;

    /// Append a prediction to the user's history
    async fn push_prediction(&self, id: ObjectId, prediction: BurnoutPrediction) -> AppResult<()>;

    /// Hard delete
    async fn delete(&self, id: ObjectId) -> AppResult<()>;
}

/// Consultation storage backend
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    async fn insert(&self, consultation: Consultation) -> AppResult<Consultation>;

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Consultation>;

    /// List consultations matching the filter, newest first
    async fn list(&self, filter: &ConsultationFilter) -> AppResult<Vec<Consultation>>;

    async fn update(&self, id: ObjectId, changes: &ConsultationChanges) -> AppResult<Consultation>;

    async fn delete(&self, id: ObjectId) -> AppResult<()>;
}
