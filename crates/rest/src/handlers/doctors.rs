//! Doctor CRUD and search handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use clinic_model::{Doctor, DoctorPatch, DoctorWithUser, NewDoctor};
use clinic_persistence::ClinicStorage;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthSession;
use crate::handlers::{SearchQuery, parse_body};
use crate::state::AppState;

/// `GET /api/doctors` - all doctors, newest first.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
) -> ApiResult<Json<Vec<DoctorWithUser>>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(state.storage().list_doctors().await?))
}

/// `GET /api/doctors/search?q=` - substring search.
pub async fn search<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<DoctorWithUser>>>
where
    S: ClinicStorage + 'static,
{
    let q = query.require()?;
    Ok(Json(state.storage().search_doctors(q).await?))
}

/// `GET /api/doctors/{id}` - one doctor.
pub async fn get<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<DoctorWithUser>>
where
    S: ClinicStorage + 'static,
{
    let doctor = state
        .storage()
        .get_doctor(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Doctor"))?;
    Ok(Json(doctor))
}

/// `POST /api/doctors` - create a doctor.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<Doctor>)>
where
    S: ClinicStorage + 'static,
{
    let new: NewDoctor = parse_body(body)?;
    let created = state.storage().create_doctor(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/doctors/{id}` - partial update.
pub async fn update<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Doctor>>
where
    S: ClinicStorage + 'static,
{
    let patch: DoctorPatch = parse_body(body)?;
    let updated = state
        .storage()
        .update_doctor(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Doctor"))?;
    Ok(Json(updated))
}

/// `DELETE /api/doctors/{id}` - idempotent delete.
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode>
where
    S: ClinicStorage + 'static,
{
    state.storage().delete_doctor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
