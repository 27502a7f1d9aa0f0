//! Session extractor.
//!
//! Authenticates a request by resolving the session cookie against the
//! store. Handlers that take [`AuthSession`] reject unauthenticated
//! requests with 401 before any of their own logic runs.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use clinic_model::{Session, User};
use clinic_persistence::ClinicStorage;

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "clinic_sid";

/// An authenticated session, resolved from the `clinic_sid` cookie.
///
/// Extraction fails with 401 when the cookie is missing, the session is
/// unknown or expired, or the session's user no longer exists.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The live session record.
    pub session: Session,
    /// The authenticated user.
    pub user: User,
}

/// Pulls the session id out of the Cookie header, if present.
fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

impl<S> FromRequestParts<AppState<S>> for AuthSession
where
    S: ClinicStorage + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let sid = session_id_from_headers(&parts.headers).ok_or(ApiError::Unauthorized)?;

        let session = state
            .storage()
            .get_session(&sid)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        let user = state
            .storage()
            .get_user(&session.user_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthSession { session, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn extracts_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "theme=dark; clinic_sid=abc-123; lang=en".parse().unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_cookie_yields_none() {
        let headers = HeaderMap::new();
        assert!(session_id_from_headers(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark".parse().unwrap());
        assert!(session_id_from_headers(&headers).is_none());
    }
}
