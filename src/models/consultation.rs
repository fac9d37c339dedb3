use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::format_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "501+")]
    Enterprise,
}

impl std::str::FromStr for CompanySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-10" => Ok(CompanySize::Micro),
            "11-50" => Ok(CompanySize::Small),
            "51-200" => Ok(CompanySize::Medium),
            "201-500" => Ok(CompanySize::Large),
            "501+" => Ok(CompanySize::Enterprise),
            other => Err(format!("Unknown company size: {}", other)),
        }
    }
}

/// Consultation workflow state. Any state may be set at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    #[default]
    Pending,
    Contacted,
    Scheduled,
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Contacted => "contacted",
            ConsultationStatus::Scheduled => "scheduled",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for ConsultationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ConsultationStatus::Pending),
            "contacted" => Ok(ConsultationStatus::Contacted),
            "scheduled" => Ok(ConsultationStatus::Scheduled),
            "completed" => Ok(ConsultationStatus::Completed),
            "cancelled" => Ok(ConsultationStatus::Cancelled),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

/// Consultation document as stored in the `consultations` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub company_size: CompanySize,
    pub message: String,
    #[serde(default)]
    pub status: ConsultationStatus,
    #[serde(default)]
    pub admin_notes: String,
    #[serde(default)]
    pub scheduled_date: Option<bson::DateTime>,
    #[serde(default)]
    pub contacted_by: Option<ObjectId>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

#[derive(Debug, Clone)]
pub struct CreateConsultation {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub company_size: CompanySize,
    pub message: String,
}

impl Consultation {
    pub fn new(input: CreateConsultation) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: ObjectId::new(),
            name: input.name,
            company: input.company,
            email: input.email.trim().to_lowercase(),
            phone: input.phone,
            company_size: input.company_size,
            message: input.message,
            status: ConsultationStatus::Pending,
            admin_notes: String::new(),
            scheduled_date: None,
            contacted_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Staff-side update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ConsultationChanges {
    pub status: Option<ConsultationStatus>,
    pub admin_notes: Option<String>,
    pub scheduled_date: Option<bson::DateTime>,
    pub contacted_by: Option<ObjectId>,
}

impl ConsultationChanges {
    pub fn apply(&self, consultation: &mut Consultation) {
        if let Some(status) = self.status {
            consultation.status = status;
        }
        if let Some(notes) = &self.admin_notes {
            consultation.admin_notes = notes.clone();
        }
        if let Some(date) = self.scheduled_date {
            consultation.scheduled_date = Some(date);
        }
        if let Some(user_id) = self.contacted_by {
            consultation.contacted_by = Some(user_id);
        }
        consultation.updated_at = bson::DateTime::now();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsultationFilter {
    pub status: Option<ConsultationStatus>,
}

/// `contactedBy` resolved against the users collection
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub company_size: CompanySize,
    pub message: String,
    pub status: ConsultationStatus,
    pub admin_notes: String,
    pub scheduled_date: Option<String>,
    pub contacted_by: Option<ContactSummary>,
    pub created_at: String,
    pub updated_at: String,
}

impl ConsultationResponse {
    pub fn new(c: Consultation, contacted_by: Option<ContactSummary>) -> Self {
        Self {
            id: c.id.to_hex(),
            name: c.name,
            company: c.company,
            email: c.email,
            phone: c.phone,
            company_size: c.company_size,
            message: c.message,
            status: c.status,
            admin_notes: c.admin_notes,
            scheduled_date: c.scheduled_date.map(format_datetime),
            contacted_by,
            created_at: format_datetime(c.created_at),
            updated_at: format_datetime(c.updated_at),
        }
    }
}
