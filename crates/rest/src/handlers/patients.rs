//! Patient CRUD and search handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use clinic_model::{NewPatient, Patient, PatientPatch, PatientWithUser};
use clinic_persistence::ClinicStorage;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthSession;
use crate::handlers::{SearchQuery, parse_body};
use crate::state::AppState;

/// `GET /api/patients` - all patients, newest first.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
) -> ApiResult<Json<Vec<PatientWithUser>>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(state.storage().list_patients().await?))
}

/// `GET /api/patients/search?q=` - substring search.
pub async fn search<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<PatientWithUser>>>
where
    S: ClinicStorage + 'static,
{
    let q = query.require()?;
    Ok(Json(state.storage().search_patients(q).await?))
}

/// `GET /api/patients/{id}` - one patient.
pub async fn get<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<PatientWithUser>>
where
    S: ClinicStorage + 'static,
{
    let patient = state
        .storage()
        .get_patient(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Patient"))?;
    Ok(Json(patient))
}

/// `POST /api/patients` - create a patient.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<Patient>)>
where
    S: ClinicStorage + 'static,
{
    let new: NewPatient = parse_body(body)?;
    let created = state.storage().create_patient(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/patients/{id}` - partial update.
pub async fn update<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Patient>>
where
    S: ClinicStorage + 'static,
{
    let patch: PatientPatch = parse_body(body)?;
    let updated = state
        .storage()
        .update_patient(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Patient"))?;
    Ok(Json(updated))
}

/// `DELETE /api/patients/{id}` - idempotent delete.
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode>
where
    S: ClinicStorage + 'static,
{
    state.storage().delete_patient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
