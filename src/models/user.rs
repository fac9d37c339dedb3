use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{format_datetime, BurnoutPrediction, PredictionRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Hr,
    Admin,
}

impl Role {
    /// Full user management
    pub const ADMIN_ONLY: &'static [Role] = &[Role::Admin];
    /// Read access to users and statistics, consultation management
    pub const STAFF: &'static [Role] = &[Role::Admin, Role::Hr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "hr" => Ok(Role::Hr),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User document as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub burnout_predictions: Vec<BurnoutPrediction>,
    pub created_at: bson::DateTime,
}

impl User {
    pub fn new(input: CreateUser, password_hash: String) -> Self {
        Self {
            id: ObjectId::new(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password: password_hash,
            role: input.role,
            bio: input.bio.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
            company: input.company.unwrap_or_default(),
            position: input.position.unwrap_or_default(),
            avatar: String::new(),
            burnout_predictions: Vec::new(),
            created_at: bson::DateTime::now(),
        }
    }

    pub fn latest_prediction(&self) -> Option<&BurnoutPrediction> {
        self.burnout_predictions.last()
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User creation DTO; the password hash is passed to `User::new` separately
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.bio.is_none()
            && self.location.is_none()
            && self.company.is_none()
            && self.position.is_none()
            && self.avatar.is_none()
    }

    /// Apply to an in-memory document
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password = hash.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        if let Some(location) = &self.location {
            user.location = location.clone();
        }
        if let Some(company) = &self.company {
            user.company = company.clone();
        }
        if let Some(position) = &self.position {
            user.position = position.clone();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = avatar.clone();
        }
    }
}

/// Filter for user listings
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                user.name.to_lowercase().contains(&term) || user.email.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Public user response (safe to return via API)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub bio: String,
    pub location: String,
    pub company: String,
    pub position: String,
    pub avatar: String,
    pub burnout_predictions: Vec<PredictionRecord>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            role: user.role,
            bio: user.bio,
            location: user.location,
            company: user.company,
            position: user.position,
            avatar: user.avatar,
            burnout_predictions: user
                .burnout_predictions
                .into_iter()
                .map(PredictionRecord::from)
                .collect(),
            created_at: format_datetime(user.created_at),
        }
    }
}
