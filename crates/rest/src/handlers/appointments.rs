//! Appointment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use clinic_model::{Appointment, AppointmentPatch, AppointmentWithDetails, NewAppointment};
use clinic_persistence::ClinicStorage;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthSession;
use crate::handlers::parse_body;
use crate::state::AppState;

/// Optional filters for the appointment list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsQuery {
    /// Restrict to one doctor's appointments.
    pub doctor_id: Option<i64>,
    /// Restrict to one patient's appointments.
    pub patient_id: Option<i64>,
}

/// `GET /api/appointments` - all appointments, optionally filtered by
/// `doctorId` or `patientId`.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Query(filter): Query<AppointmentsQuery>,
) -> ApiResult<Json<Vec<AppointmentWithDetails>>>
where
    S: ClinicStorage + 'static,
{
    let appointments = match (filter.doctor_id, filter.patient_id) {
        (Some(doctor_id), _) => state.storage().appointments_by_doctor(doctor_id).await?,
        (None, Some(patient_id)) => state.storage().appointments_by_patient(patient_id).await?,
        (None, None) => state.storage().list_appointments().await?,
    };
    Ok(Json(appointments))
}

/// `GET /api/appointments/{id}` - one appointment.
pub async fn get<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<AppointmentWithDetails>>
where
    S: ClinicStorage + 'static,
{
    let appointment = state
        .storage()
        .get_appointment(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Appointment"))?;
    Ok(Json(appointment))
}

/// `POST /api/appointments` - create an appointment.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<Appointment>)>
where
    S: ClinicStorage + 'static,
{
    let new: NewAppointment = parse_body(body)?;
    let created = state.storage().create_appointment(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/appointments/{id}` - partial update.
pub async fn update<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Appointment>>
where
    S: ClinicStorage + 'static,
{
    let patch: AppointmentPatch = parse_body(body)?;
    let updated = state
        .storage()
        .update_appointment(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Appointment"))?;
    Ok(Json(updated))
}

/// `DELETE /api/appointments/{id}` - idempotent delete.
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode>
where
    S: ClinicStorage + 'static,
{
    state.storage().delete_appointment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
