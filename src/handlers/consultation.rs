use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, Time,
};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::handlers::common::{parse_object_id, validate_email, MessageResponse, ValidJson};
use crate::middlewares::AuthUser;
use crate::models::{
    CompanySize, ContactSummary, Consultation, ConsultationChanges, ConsultationFilter,
    ConsultationResponse, ConsultationStatus, CreateConsultation,
};
use crate::state::AppState;

// ============ Request/Response DTOs ============

/// Public "For Employers" form. Every field is required.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitConsultationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// One of `1-10`, `11-50`, `51-200`, `201-500`, `501+`
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultationRequest {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
    /// RFC 3339, `YYYY-MM-DDTHH:MM`, or `YYYY-MM-DD` (UTC)
    pub scheduled_date: Option<String>,
    /// User ID of the staff member who made contact
    pub contacted_by: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListConsultationsParams {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsultationEnvelope {
    pub message: String,
    pub consultation: ConsultationResponse,
}

// ============ Helpers ============

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM`, or `YYYY-MM-DD`; naive values are UTC
fn parse_schedule_date(raw: &str) -> AppResult<bson::DateTime> {
    let raw = raw.trim();

    let parsed = OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| {
            PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
                .map(PrimitiveDateTime::assume_utc)
        })
        .or_else(|_| {
            Date::parse(raw, format_description!("[year]-[month]-[day]"))
                .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
        })
        .map_err(|_| AppError::Validation(format!("Invalid scheduledDate: {}", raw)))?;

    Ok(bson::DateTime::from_millis(
        (parsed.unix_timestamp_nanos() / 1_000_000) as i64,
    ))
}

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("All fields are required ({} missing)", field)))
}

/// Resolve `contactedBy` ids to name/email, caching repeated lookups
async fn resolve_contacts(
    state: &AppState,
    ids: impl Iterator<Item = ObjectId>,
) -> AppResult<HashMap<ObjectId, ContactSummary>> {
    let mut contacts = HashMap::new();

    for id in ids {
        if contacts.contains_key(&id) {
            continue;
        }
        match state.users.find_by_id(id).await {
            Ok(user) => {
                contacts.insert(
                    id,
                    ContactSummary {
                        id: user.id.to_hex(),
                        name: user.name,
                        email: user.email,
                    },
                );
            }
            // Staff account deleted since
            Err(AppError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(contacts)
}

async fn to_response(state: &AppState, consultation: Consultation) -> AppResult<ConsultationResponse> {
    let mut contacts = resolve_contacts(state, consultation.contacted_by.into_iter()).await?;
    let contact = consultation
        .contacted_by
        .and_then(|id| contacts.remove(&id));
    Ok(ConsultationResponse::new(consultation, contact))
}

// ============ Handlers ============

/// Submit a consultation request (public)
#[utoipa::path(
    post,
    path = "/api/consultation/submit",
    request_body = SubmitConsultationRequest,
    responses(
        (status = 201, description = "Consultation submitted", body = ConsultationEnvelope),
        (status = 400, description = "Validation error")
    ),
    tag = "Consultations"
)]
pub async fn submit_consultation(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SubmitConsultationRequest>,
) -> AppResult<(StatusCode, Json<ConsultationEnvelope>)> {
    let company_size = required("companySize", payload.company_size)?
        .parse::<CompanySize>()
        .map_err(AppError::Validation)?;

    let input = CreateConsultation {
        name: required("name", payload.name)?,
        company: required("company", payload.company)?,
        email: validate_email(&required("email", payload.email)?)?,
        phone: required("phone", payload.phone)?,
        company_size,
        message: required("message", payload.message)?,
    };

    let consultation = state
        .consultations
        .insert(Consultation::new(input))
        .await?;
    tracing::info!(consultation_id = %consultation.id, "Consultation submitted");

    Ok((
        StatusCode::CREATED,
        Json(ConsultationEnvelope {
            message: "Consultation request submitted successfully".to_string(),
            consultation: ConsultationResponse::new(consultation, None),
        }),
    ))
}

/// List consultations, newest first
#[utoipa::path(
    get,
    path = "/api/consultation",
    params(ListConsultationsParams),
    responses(
        (status = 200, description = "Consultations", body = [ConsultationResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff role required")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Consultations"
)]
pub async fn list_consultations(
    State(state): State<AppState>,
    Query(params): Query<ListConsultationsParams>,
) -> AppResult<Json<Vec<ConsultationResponse>>> {
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ConsultationStatus>().map_err(AppError::Validation)?),
    };

    let consultations = state
        .consultations
        .list(&ConsultationFilter { status })
        .await?;

    let contacts =
        resolve_contacts(&state, consultations.iter().filter_map(|c| c.contacted_by)).await?;

    let data = consultations
        .into_iter()
        .map(|c| {
            let contact = c.contacted_by.and_then(|id| contacts.get(&id).cloned());
            ConsultationResponse::new(c, contact)
        })
        .collect();

    Ok(Json(data))
}

/// Get a consultation by ID
#[utoipa::path(
    get,
    path = "/api/consultation/{id}",
    params(
        ("id" = String, Path, description = "Consultation ID")
    ),
    responses(
        (status = 200, description = "Consultation details", body = ConsultationResponse),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "Consultation not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Consultations"
)]
pub async fn get_consultation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ConsultationResponse>> {
    let consultation = state.consultations.find_by_id(parse_object_id(&id)?).await?;
    Ok(Json(to_response(&state, consultation).await?))
}

/// Update status, notes, schedule, or contact of a consultation
#[utoipa::path(
    put,
    path = "/api/consultation/{id}",
    params(
        ("id" = String, Path, description = "Consultation ID")
    ),
    request_body = UpdateConsultationRequest,
    responses(
        (status = 200, description = "Consultation updated", body = ConsultationEnvelope),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "Consultation not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Consultations"
)]
pub async fn update_consultation(
    staff: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateConsultationRequest>,
) -> AppResult<Json<ConsultationEnvelope>> {
    let id = parse_object_id(&id)?;

    let status = match payload.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ConsultationStatus>().map_err(AppError::Validation)?),
    };
    let scheduled_date = match payload.scheduled_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_schedule_date(raw)?),
    };
    let contacted_by = match payload.contacted_by.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_object_id(raw)?),
    };

    let changes = ConsultationChanges {
        status,
        admin_notes: payload.admin_notes,
        scheduled_date,
        contacted_by,
    };

    let consultation = state.consultations.update(id, &changes).await?;
    tracing::info!(
        consultation_id = %id,
        staff_id = %staff.id,
        status = consultation.status.as_str(),
        "Consultation updated"
    );

    Ok(Json(ConsultationEnvelope {
        message: "Consultation updated successfully".to_string(),
        consultation: to_response(&state, consultation).await?,
    }))
}

/// Delete a consultation
#[utoipa::path(
    delete,
    path = "/api/consultation/{id}",
    params(
        ("id" = String, Path, description = "Consultation ID")
    ),
    responses(
        (status = 200, description = "Consultation deleted", body = MessageResponse),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "Consultation not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Consultations"
)]
pub async fn delete_consultation(
    staff: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_object_id(&id)?;
    state.consultations.delete(id).await?;

    tracing::info!(consultation_id = %id, staff_id = %staff.id, "Consultation deleted");
    Ok(Json(MessageResponse::new("Consultation deleted successfully")))
}
