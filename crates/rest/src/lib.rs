//! # clinic-rest - Clinic Management REST API
//!
//! This crate implements the HTTP surface of the Clinic Management Server:
//! session-cookie authentication and CRUD endpoints for patients, doctors,
//! drugs, appointments, and admissions, plus search, inventory, and
//! dashboard aggregation endpoints.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clinic_rest::{create_app, ServerConfig};
//! use clinic_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("clinic.db")?;
//!     backend.init_schema()?;
//!
//!     let app = create_app(backend);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | sign in | POST | `/api/auth/login` |
//! | sign out | POST | `/api/auth/logout` |
//! | current user | GET | `/api/auth/user` |
//! | list / create | GET / POST | `/api/{entity}` |
//! | read / update / delete | GET / PUT / DELETE | `/api/{entity}/{id}` |
//! | search | GET | `/api/{entity}/search?q=` |
//! | low stock | GET | `/api/drugs/low-stock` |
//! | active admissions | GET | `/api/admissions/active` |
//! | dashboard | GET | `/api/dashboard/stats` |
//! | health | GET | `/health` |
//!
//! ## Error Handling
//!
//! Every error body is JSON with a `message` field:
//!
//! | HTTP Status | Description |
//! |-------------|-------------|
//! | 400 | Malformed body or validation failure (`errors` array included) |
//! | 401 | Missing or expired session |
//! | 404 | Entity not found |
//! | 500 | Storage failure (detail stays in server logs) |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their JSON renderings
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration)
//! - [`extractors`] - Session authentication extractor
//! - [`handlers`] - HTTP request handlers per entity
//! - [`routing`] - Route configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use clinic_persistence::ClinicStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: ClinicStorage + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: ClinicStorage + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    let state = AppState::new(Arc::new(storage), config.clone());

    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at application startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("clinic_rest={level},tower_http=debug")));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
