//! Drug inventory handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use clinic_model::{Drug, DrugPatch, NewDrug};
use clinic_persistence::ClinicStorage;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthSession;
use crate::handlers::{SearchQuery, parse_body};
use crate::state::AppState;

/// `GET /api/drugs` - all drugs, newest first.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
) -> ApiResult<Json<Vec<Drug>>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(state.storage().list_drugs().await?))
}

/// `GET /api/drugs/search?q=` - substring search.
pub async fn search<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Drug>>>
where
    S: ClinicStorage + 'static,
{
    let q = query.require()?;
    Ok(Json(state.storage().search_drugs(q).await?))
}

/// `GET /api/drugs/low-stock` - drugs at or below the threshold.
pub async fn low_stock<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
) -> ApiResult<Json<Vec<Drug>>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(state.storage().low_stock_drugs().await?))
}

/// `GET /api/drugs/{id}` - one drug.
pub async fn get<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<Drug>>
where
    S: ClinicStorage + 'static,
{
    let drug = state
        .storage()
        .get_drug(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Drug"))?;
    Ok(Json(drug))
}

/// `POST /api/drugs` - create a drug.
pub async fn create<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<Drug>)>
where
    S: ClinicStorage + 'static,
{
    let new: NewDrug = parse_body(body)?;
    let created = state.storage().create_drug(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/drugs/{id}` - partial update.
pub async fn update<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Drug>>
where
    S: ClinicStorage + 'static,
{
    let patch: DrugPatch = parse_body(body)?;
    let updated = state
        .storage()
        .update_drug(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Drug"))?;
    Ok(Json(updated))
}

/// `DELETE /api/drugs/{id}` - idempotent delete.
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode>
where
    S: ClinicStorage + 'static,
{
    state.storage().delete_drug(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
