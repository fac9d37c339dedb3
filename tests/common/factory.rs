use bson::oid::ObjectId;
use serde_json::{json, Value};
use uuid::Uuid;

use rekindle::models::{
    BurnoutPrediction, CompanySize, CompanyType, Consultation, CreateConsultation, CreateUser,
    Gender, PredictionInput, Role, User, WfhSetup,
};
use rekindle::services::AuthService;
use rekindle::state::AppState;

pub const TEST_PASSWORD: &str = "password123";

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user_id: ObjectId,
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Valid prediction request body
#[allow(dead_code)]
pub fn prediction_body() -> Value {
    json!({
        "designation": 2,
        "resource_allocation": 60.0,
        "mental_fatigue_score": 6.5,
        "company_type": "Service",
        "wfh_setup_available": "No",
        "gender": "Female"
    })
}

fn prediction_input() -> PredictionInput {
    PredictionInput {
        designation: 2,
        resource_allocation: 60.0,
        mental_fatigue_score: 6.5,
        company_type: CompanyType::Service,
        wfh_setup_available: WfhSetup::No,
        gender: Gender::Female,
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a user with the given role and return auth info
    pub async fn create_user(&self, role: Role) -> TestAuth {
        let unique_id = Uuid::new_v4();
        let name = format!("Test User {}", unique_id);
        let email = format!("test-{}@example.com", unique_id);
        let user = self.create_user_with(&name, &email, role).await;

        let token = AuthService::generate_token(user.id, role, &self.state.config).unwrap();

        TestAuth {
            user_id: user.id,
            email: user.email,
            token,
        }
    }

    /// Create a user with specific name and email (password is `TEST_PASSWORD`)
    pub async fn create_user_with(&self, name: &str, email: &str, role: Role) -> User {
        let input = CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            role,
            bio: None,
            location: None,
            company: None,
            position: None,
        };

        let password_hash =
            AuthService::hash_password(TEST_PASSWORD, self.state.config.bcrypt_cost).unwrap();
        self.state
            .users
            .insert(User::new(input, password_hash))
            .await
            .unwrap()
    }

    /// Create a regular user whose history holds the given scores, oldest first
    pub async fn create_user_with_predictions(&self, name: &str, scores: &[f64]) -> User {
        let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4());
        let user = self.create_user_with(name, &email, Role::User).await;

        for (i, score) in scores.iter().enumerate() {
            let mut prediction = BurnoutPrediction::new(*score, &prediction_input());
            prediction.date = bson::DateTime::from_millis(1_700_000_000_000 + i as i64 * 1_000);
            self.state
                .users
                .push_prediction(user.id, prediction)
                .await
                .unwrap();
        }

        self.state.users.find_by_id(user.id).await.unwrap()
    }

    /// Create a pending consultation request
    pub async fn create_consultation(&self, company: &str) -> Consultation {
        let input = CreateConsultation {
            name: "Pat Employer".to_string(),
            company: company.to_string(),
            email: format!("contact-{}@example.com", Uuid::new_v4()),
            phone: "555-0100".to_string(),
            company_size: CompanySize::Medium,
            message: "Our team is showing signs of burnout".to_string(),
        };

        self.state
            .consultations
            .insert(Consultation::new(input))
            .await
            .unwrap()
    }
}
