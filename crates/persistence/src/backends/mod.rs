//! Backend implementations.

pub mod sqlite;
