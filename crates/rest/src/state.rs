//! Shared application state for the clinic REST API.

use std::sync::Arc;

use clinic_persistence::ClinicStorage;

use crate::config::ServerConfig;

/// Shared state available to every request handler.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`ClinicStorage`])
pub struct AppState<S> {
    storage: Arc<S>,
    config: Arc<ServerConfig>,
}

// Manual Clone: S sits behind an Arc and need not be Clone itself.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: ClinicStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the configured session lifetime.
    pub fn session_ttl(&self) -> chrono::Duration {
        self.config.session_ttl()
    }
}
