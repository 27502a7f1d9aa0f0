//! Sign-in, sign-out, and current-user handlers.
//!
//! The sign-in flow takes the caller's identity assertion, upserts the
//! user record, and issues an opaque session cookie. There is no password
//! check here; deployments put an authenticating proxy in front and the
//! proxy vouches for the identity payload.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use clinic_model::{UpsertUser, User};
use clinic_persistence::ClinicStorage;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthSession, SESSION_COOKIE};
use crate::handlers::parse_body;
use crate::state::AppState;

fn session_cookie(sid: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={sid}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// `POST /api/auth/login` - upsert the user and issue a session cookie.
pub async fn login<S>(
    State(state): State<AppState<S>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Response>
where
    S: ClinicStorage + 'static,
{
    let upsert: UpsertUser = parse_body(body)?;

    let user = state.storage().upsert_user(upsert).await?;
    let session = state
        .storage()
        .create_session(&user.id, state.session_ttl())
        .await?;

    tracing::debug!(user_id = %user.id, "user signed in");

    let mut headers = HeaderMap::new();
    let cookie = session_cookie(&session.sid, state.config().session_ttl_secs);
    headers.insert(
        header::SET_COOKIE,
        cookie.parse().map_err(|_| ApiError::Internal)?,
    );

    Ok((StatusCode::OK, headers, Json(user)).into_response())
}

/// `POST /api/auth/logout` - delete the session and clear the cookie.
pub async fn logout<S>(
    State(state): State<AppState<S>>,
    auth: AuthSession,
) -> ApiResult<Response>
where
    S: ClinicStorage + 'static,
{
    state.storage().delete_session(&auth.session.sid).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie("", 0)
            .parse()
            .map_err(|_| ApiError::Internal)?,
    );

    Ok((StatusCode::NO_CONTENT, headers).into_response())
}

/// `GET /api/auth/user` - the authenticated user.
pub async fn current_user<S>(
    State(_state): State<AppState<S>>,
    auth: AuthSession,
) -> ApiResult<Json<User>>
where
    S: ClinicStorage + 'static,
{
    Ok(Json(auth.user))
}
