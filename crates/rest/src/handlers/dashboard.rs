//! Dashboard aggregation handler.

use axum::Json;
use axum::extract::State;

use clinic_model::DashboardStats;
use clinic_persistence::ClinicStorage;

use crate::error::ApiResult;
use crate::extractors::AuthSession;
use crate::state::AppState;

/// `GET /api/dashboard/stats` - the six dashboard counts.
pub async fn stats<S>(
    State(state): State<AppState<S>>,
    _auth: AuthSession,
) -> ApiResult<Json<DashboardStats>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(state.storage().dashboard_stats().await?))
}
