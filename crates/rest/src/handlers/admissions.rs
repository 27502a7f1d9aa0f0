//! Admission handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use clinic_model::{Admission, AdmissionPatch, AdmissionWithDetails, NewAdmission};
use clinic_persistence::ClinicStorage;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthSession;
use crate::handlers::parse_body;
use crate::state::AppState;

/// `GET /api/admissions` - all admissions, latest first.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
) -> ApiResult<Json<Vec<AdmissionWithDetails>>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(state.storage().list_admissions().await?))
}

/// `GET /api/admissions/active` - admissions still marked admitted.
pub async fn active<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
) -> ApiResult<Json<Vec<AdmissionWithDetails>>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(state.storage().active_admissions().await?))
}

/// `GET /api/admissions/{id}` - one admission.
pub async fn get<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<AdmissionWithDetails>>
where
    S: ClinicStorage + 'static,
{
    let admission = state
        .storage()
        .get_admission(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Admission"))?;
    Ok(Json(admission))
}

/// `POST /api/admissions` - create an admission.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<Admission>)>
where
    S: ClinicStorage + 'static,
{
    let new: NewAdmission = parse_body(body)?;
    let created = state.storage().create_admission(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/admissions/{id}` - partial update.
pub async fn update<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Admission>>
where
    S: ClinicStorage + 'static,
{
    let patch: AdmissionPatch = parse_body(body)?;
    let updated = state
        .storage()
        .update_admission(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Admission"))?;
    Ok(Json(updated))
}

/// `DELETE /api/admissions/{id}` - idempotent delete.
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode>
where
    S: ClinicStorage + 'static,
{
    state.storage().delete_admission(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
