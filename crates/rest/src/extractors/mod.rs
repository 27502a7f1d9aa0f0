//! Axum extractors for the clinic REST API.

pub mod session;

pub use session::{AuthSession, SESSION_COOKIE};
