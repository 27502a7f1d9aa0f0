//! Server configuration for the clinic REST API.
//!
//! Configuration can come from command line arguments, environment
//! variables, or be built programmatically.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CLINIC_SERVER_PORT` | 8080 | Server port |
//! | `CLINIC_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `CLINIC_LOG_LEVEL` | info | Log level |
//! | `CLINIC_DATABASE_URL` | (in-memory) | SQLite database path |
//! | `CLINIC_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `CLINIC_ENABLE_CORS` | true | Enable CORS |
//! | `CLINIC_CORS_ORIGINS` | * | Allowed origins |
//! | `CLINIC_SESSION_TTL` | 604800 | Session lifetime (seconds) |

use clap::Parser;

/// Server configuration for the clinic REST API.
///
/// Construct from command line arguments and the environment with
/// [`ServerConfig::parse`], or directly.
#[derive(Debug, Clone, Parser)]
#[command(name = "clinic-server")]
#[command(about = "Clinic Management REST Server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "CLINIC_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CLINIC_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CLINIC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// SQLite database path; omit for an in-memory database.
    #[arg(long, env = "CLINIC_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "CLINIC_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "CLINIC_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "CLINIC_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "CLINIC_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "CLINIC_CORS_HEADERS",
        default_value = "Content-Type,Accept,Cookie"
    )]
    pub cors_headers: String,

    /// Session lifetime in seconds.
    #[arg(long, env = "CLINIC_SESSION_TTL", default_value = "604800")]
    pub session_ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            database_url: None,
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept,Cookie".to_string(),
            session_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the session lifetime as a duration.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }
        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }
        if self.session_ttl_secs <= 0 {
            errors.push("Session TTL must be positive".to_string());
        }
        if !["error", "warn", "info", "debug", "trace"].contains(&self.log_level.as_str()) {
            errors.push(format!("Unknown log level: {}", self.log_level));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// A configuration suitable for tests: short timeouts, quiet logs.
    pub fn for_testing() -> Self {
        Self {
            log_level: "error".to_string(),
            request_timeout: 5,
            session_ttl_secs: 3600,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_port_fails_validation() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn negative_session_ttl_fails_validation() {
        let config = ServerConfig {
            session_ttl_secs: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn socket_addr_joins_host_and_port() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }
}
