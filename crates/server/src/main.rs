//! Clinic Management Server
//!
//! A session-backed REST API for clinic operations: patients, doctors,
//! drug inventory, appointments, and admissions.

use clap::Parser;
use tracing::info;

use clinic_persistence::backends::sqlite::SqliteBackend;
use clinic_rest::{ServerConfig, create_app_with_config, init_logging};

/// Creates and initializes the SQLite backend from the server configuration.
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let backend = match config.database_url.as_deref() {
        Some(path) if path != ":memory:" => {
            info!(database = %path, "Initializing SQLite backend");
            SqliteBackend::open(path)?
        }
        _ => {
            info!("Initializing in-memory SQLite backend");
            SqliteBackend::in_memory()?
        }
    };
    backend.init_schema()?;
    Ok(backend)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {error}");
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        "Starting Clinic Management Server"
    );

    let backend = create_sqlite_backend(&config)?;
    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}
