//! Persistence Layer Error Types
//!
//! Error mapping to domain types

use makoto_domain::errors::DomainError;
use thiserror::Error;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Aggregate could not be turned into a document
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored document is missing fields or fails re-validation
    #[error("Deserialization error in {collection}: {reason}")]
    Deserialization { collection: String, reason: String },

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Database error
    #[error("Database error ({backend}): {reason}")]
    Database {
        backend: &'static str,
        reason: String,
    },
}

impl PersistenceError {
    /// Create a deserialization error
    pub fn corrupt(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            collection: collection.into(),
            reason: reason.into(),
        }
    }

    /// Create a database error
    pub fn database(backend: &'static str, reason: impl Into<String>) -> Self {
        Self::Database {
            backend,
            reason: reason.into(),
        }
    }
}

/// Convert persistence errors to domain errors
impl From<PersistenceError> for DomainError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Deserialization { collection, reason } => {
                DomainError::corrupt(collection, reason)
            }
            PersistenceError::Serialization(msg) => DomainError::storage("serde", msg),
            PersistenceError::Connection(msg) => DomainError::storage("connection", msg),
            PersistenceError::Database { backend, reason } => DomainError::storage(backend, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makoto_domain::errors::ErrorKind;

    #[test]
    fn test_corrupt_error() {
        let err = PersistenceError::corrupt("stores", "missing field `name`");
        assert!(err.to_string().contains("stores"));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_error_conversion() {
        let domain_err: DomainError = PersistenceError::corrupt("surveys", "bad").into();
        assert_eq!(domain_err.kind(), ErrorKind::CorruptRecord);

        let domain_err: DomainError = PersistenceError::database("SurrealDB", "timeout").into();
        assert!(matches!(domain_err, DomainError::Storage { .. }));
        assert_eq!(domain_err.kind(), ErrorKind::Storage);
    }
}
