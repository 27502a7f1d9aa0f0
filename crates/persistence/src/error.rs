//! Error types for the persistence layer.
//!
//! Absence is not an error here: `get_*` operations return `Option` and
//! deletes are idempotent. The variants below cover genuine store failures
//! only, which the REST layer logs and surfaces as a generic failure.

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Connecting to the store failed.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        /// Driver-level detail.
        message: String,
    },

    /// The connection pool had no connection available in time.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Executing a statement failed.
    #[error("query execution failed: {message}")]
    Query {
        /// Driver-level detail.
        message: String,
    },

    /// A stored value could not be decoded into its model type.
    #[error("row decoding failed: {message}")]
    Decode {
        /// What failed to decode.
        message: String,
    },
}

impl StorageError {
    /// Shorthand for a query failure.
    pub fn query(message: impl Into<String>) -> Self {
        StorageError::Query {
            message: message.into(),
        }
    }

    /// Shorthand for a decode failure.
    pub fn decode(message: impl Into<String>) -> Self {
        StorageError::Decode {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::InvalidColumnType(..) => StorageError::Decode {
                message: err.to_string(),
            },
            other => StorageError::Query {
                message: other.to_string(),
            },
        }
    }
}

impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::PoolExhausted
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = StorageError::query("no such table: patients");
        assert_eq!(
            err.to_string(),
            "query execution failed: no such table: patients"
        );

        let err = StorageError::decode("bad timestamp");
        assert_eq!(err.to_string(), "row decoding failed: bad timestamp");

        assert_eq!(
            StorageError::PoolExhausted.to_string(),
            "connection pool exhausted"
        );
    }

    #[test]
    fn rusqlite_conversion_classifies() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::Query { .. }));

        let err: StorageError = rusqlite::Error::InvalidColumnType(
            0,
            "created_at".to_string(),
            rusqlite::types::Type::Null,
        )
        .into();
        assert!(matches!(err, StorageError::Decode { .. }));
    }
}
