//! Clinic Management Server persistence layer.
//!
//! This crate provides the data-access layer behind the clinic REST API:
//! one narrow operation per entity, each a single parameterized statement
//! against the persistent store. There are no cross-entity transactions,
//! no retries, no pagination, and no caching; every read goes to the store
//! and concurrent writers fall back to last-write-wins on a single row.
//!
//! # Architecture
//!
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`ClinicStorage`] trait consumed by the REST layer
//! - [`backends`] - Backend implementations (SQLite)
//!
//! # Quick Start
//!
//! ```no_run
//! use clinic_persistence::backends::sqlite::SqliteBackend;
//! use clinic_persistence::core::ClinicStorage;
//! use clinic_model::NewPatient;
//!
//! # async fn demo() -> clinic_persistence::StorageResult<()> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let created = backend
//!     .create_patient(NewPatient {
//!         user_id: None,
//!         first_name: "Ada".to_string(),
//!         last_name: "Lovelace".to_string(),
//!         email: None,
//!         phone: None,
//!         date_of_birth: None,
//!         gender: None,
//!         address: None,
//!         emergency_contact: None,
//!         medical_history: None,
//!     })
//!     .await?;
//!
//! let fetched = backend.get_patient(created.id).await?;
//! assert!(fetched.is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;

pub use crate::core::ClinicStorage;
pub use error::{StorageError, StorageResult};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
