//! Health and liveness handlers.
//!
//! These sit outside `/api` and require no session, so orchestrators can
//! probe them without credentials.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

use clinic_persistence::ClinicStorage;

use crate::state::AppState;

/// `GET /health` - checks the storage backend is reachable.
pub async fn health<S>(State(state): State<AppState<S>>) -> (StatusCode, Json<serde_json::Value>)
where
    S: ClinicStorage + 'static,
{
    match state.storage().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "backend": state.storage().backend_name(),
            })),
        ),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "backend": state.storage().backend_name(),
                })),
            )
        }
    }
}

/// `GET /_liveness` - process liveness only, no dependencies consulted.
pub async fn liveness() -> &'static str {
    "OK"
}
