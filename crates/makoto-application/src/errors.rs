//! Application layer error types
//!
//! These errors represent application-level failures that are suitable
//! for API/UI consumption. Domain errors keep their kind when wrapped.

use makoto_domain::errors::{DomainError, ErrorKind};
use thiserror::Error;

/// Application layer result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Application layer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    // === Validation Errors ===

    /// Input failed value-object or aggregate validation
    #[error("Validation failed: {0}")]
    Validation(DomainError),

    /// A save path was called without an aggregate
    #[error("{0} is required")]
    MissingAggregate(&'static str),

    // === Not Found Errors ===

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    // === Infrastructure Errors ===

    /// Repository operation failed
    #[error("Repository error: {0}")]
    Repository(DomainError),

    /// A stored record no longer satisfies the domain rules
    #[error("Domain error: {0}")]
    Domain(DomainError),

    // === Request Lifecycle ===

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,
}

impl ApplicationError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Kind of the wrapped domain error, if any
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Validation(e) | Self::Repository(e) | Self::Domain(e) => Some(e.kind()),
            Self::NotFound { .. } => Some(ErrorKind::NotFound),
            Self::MissingAggregate(_) => Some(ErrorKind::Validation),
            Self::Cancelled | Self::DeadlineExceeded => None,
        }
    }

    /// Whether the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::MissingAggregate(_) | Self::NotFound { .. }
        )
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err.kind() {
            ErrorKind::Validation | ErrorKind::Format => ApplicationError::Validation(err),
            ErrorKind::NotFound => match err {
                DomainError::NotFound { entity_type, id } => {
                    ApplicationError::NotFound { entity_type, id }
                }
                other => ApplicationError::Domain(other),
            },
            ErrorKind::Storage => ApplicationError::Repository(err),
            ErrorKind::CorruptRecord => ApplicationError::Domain(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ApplicationError::from(DomainError::required("name"));
        assert_eq!(err.to_string(), "Validation failed: name is required");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_not_found_error_display() {
        let err = ApplicationError::not_found("store", "65a1b2c3d4e5f60718293a4b");
        assert_eq!(err.to_string(), "store not found: 65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_domain_error_conversion_keeps_kind() {
        let cases = [
            (DomainError::format("id", "not hex"), ErrorKind::Format),
            (DomainError::storage("SurrealDB", "down"), ErrorKind::Storage),
            (DomainError::corrupt("stores", "bad enum"), ErrorKind::CorruptRecord),
            (DomainError::not_found("survey", "x"), ErrorKind::NotFound),
        ];
        for (domain, kind) in cases {
            assert_eq!(ApplicationError::from(domain).kind(), Some(kind));
        }
    }

    #[test]
    fn test_storage_failure_is_not_client_error() {
        let err = ApplicationError::from(DomainError::storage("memory", "poisoned"));
        assert!(matches!(err, ApplicationError::Repository(_)));
        assert!(!err.is_client_error());
    }
}
