use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{
    BurnoutPrediction, Consultation, ConsultationChanges, ConsultationFilter, User, UserChanges,
    UserFilter,
};
use crate::repositories::{ConsultationStore, UserStore};

/// In-memory user store for testing
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        // Reverse first so equal timestamps keep newest-inserted first
        let mut matched: Vec<User> = users
            .iter()
            .rev()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn update(&self, id: ObjectId, changes: &UserChanges) -> AppResult<User> {
        let mut users = self.users.write().await;

        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        changes.apply(user);
        Ok(user.clone())
    }

    async fn push_prediction(&self, id: ObjectId, prediction: BurnoutPrediction) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        user.burnout_predictions.push(prediction);
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(())
    }
}

/// In-memory consultation store for testing
#[derive(Clone, Default)]
pub struct InMemoryConsultationStore {
    consultations: Arc<RwLock<Vec<Consultation>>>,
}

impl InMemoryConsultationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConsultationStore for InMemoryConsultationStore {
    async fn insert(&self, consultation: Consultation) -> AppResult<Consultation> {
        self.consultations.write().await.push(consultation.clone());
        Ok(consultation)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Consultation> {
        let consultations = self.consultations.read().await;
        consultations
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Consultation".to_string()))
    }

    async fn list(&self, filter: &ConsultationFilter) -> AppResult<Vec<Consultation>> {
        let consultations = self.consultations.read().await;
        let mut matched: Vec<Consultation> = consultations
            .iter()
            .rev()
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn update(&self, id: ObjectId, changes: &ConsultationChanges) -> AppResult<Consultation> {
        let mut consultations = self.consultations.write().await;
        let consultation = consultations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Consultation".to_string()))?;
        changes.apply(consultation);
        Ok(consultation.clone())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let mut consultations = self.consultations.write().await;
        let before = consultations.len();
        consultations.retain(|c| c.id != id);
        if consultations.len() == before {
            return Err(AppError::NotFound("Consultation".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CompanySize, CompanyType, ConsultationStatus, CreateConsultation, CreateUser, Gender,
        PredictionInput, Role, WfhSetup,
    };

    fn user(email: &str, role: Role) -> User {
        User::new(
            CreateUser {
                name: format!("User {}", email),
                email: email.to_string(),
                role,
                bio: None,
                location: None,
                company: None,
                position: None,
            },
            "hash".to_string(),
        )
    }

    fn consultation() -> Consultation {
        Consultation::new(CreateConsultation {
            name: "Lee".to_string(),
            company: "Initech".to_string(),
            email: "lee@initech.com".to_string(),
            phone: "555-0199".to_string(),
            company_size: CompanySize::Large,
            message: "Help".to_string(),
        })
    }

    fn input() -> PredictionInput {
        PredictionInput {
            designation: 1,
            resource_allocation: 30.0,
            mental_fatigue_score: 4.0,
            company_type: CompanyType::Product,
            wfh_setup_available: WfhSetup::Yes,
            gender: Gender::Male,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.insert(user("a@example.com", Role::User)).await.unwrap();

        let result = store.insert(user("a@example.com", Role::Hr)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_role_newest_first() {
        let store = InMemoryUserStore::new();
        let first = store.insert(user("a@example.com", Role::User)).await.unwrap();
        store.insert(user("hr@example.com", Role::Hr)).await.unwrap();
        let last = store.insert(user("b@example.com", Role::User)).await.unwrap();

        let users = store
            .list(&UserFilter {
                role: Some(Role::User),
                search: None,
            })
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, last.id);
        assert_eq!(users[1].id, first.id);
    }

    #[tokio::test]
    async fn test_push_prediction_appends() {
        let store = InMemoryUserStore::new();
        let u = store.insert(user("a@example.com", Role::User)).await.unwrap();

        store
            .push_prediction(u.id, BurnoutPrediction::new(55.0, &input()))
            .await
            .unwrap();
        store
            .push_prediction(u.id, BurnoutPrediction::new(65.0, &input()))
            .await
            .unwrap();

        let stored = store.find_by_id(u.id).await.unwrap();
        assert_eq!(stored.burnout_predictions.len(), 2);
        assert_eq!(stored.latest_prediction().unwrap().prediction, 65.0);
    }

    #[tokio::test]
    async fn test_push_prediction_unknown_user() {
        let store = InMemoryUserStore::new();
        let result = store
            .push_prediction(ObjectId::new(), BurnoutPrediction::new(10.0, &input()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        let store = InMemoryUserStore::new();
        store.insert(user("a@example.com", Role::User)).await.unwrap();
        let b = store.insert(user("b@example.com", Role::User)).await.unwrap();

        let changes = UserChanges {
            email: Some("a@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(b.id, &changes).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let store = InMemoryUserStore::new();
        let u = store.insert(user("a@example.com", Role::User)).await.unwrap();

        store.delete(u.id).await.unwrap();
        assert!(store.find_by_id(u.id).await.is_err());
        assert!(store.delete(u.id).await.is_err());
    }

    #[tokio::test]
    async fn test_consultation_status_filter() {
        let store = InMemoryConsultationStore::new();
        let c = store.insert(consultation()).await.unwrap();
        store.insert(consultation()).await.unwrap();

        store
            .update(
                c.id,
                &ConsultationChanges {
                    status: Some(ConsultationStatus::Contacted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let contacted = store
            .list(&ConsultationFilter {
                status: Some(ConsultationStatus::Contacted),
            })
            .await
            .unwrap();
        assert_eq!(contacted.len(), 1);
        assert_eq!(contacted[0].id, c.id);

        let all = store.list(&ConsultationFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
