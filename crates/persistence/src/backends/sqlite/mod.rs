//! SQLite backend.
//!
//! Stores each entity in its own table with auto-assigned integer primary
//! keys (User keyed by its external string id). Timestamps are RFC3339 text
//! with fixed microsecond precision so lexicographic ordering is
//! chronological; dates are ISO text; decimals are text. Foreign keys are
//! advisory only — no constraints are declared and joined reads degrade a
//! dangling reference to a null related entity.

mod backend;
mod rows;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::SCHEMA_VERSION;
