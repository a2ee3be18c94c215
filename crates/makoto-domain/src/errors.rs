//! Domain errors for makoto-club

use thiserror::Error;

/// Core domain errors
///
/// Every failure the core can produce is one of these variants. The HTTP layer
/// only ever needs [`DomainError::kind`] to pick a status code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid {field} format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} out of range: {reason}")]
    OutOfRange { field: String, reason: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} accepts at most {max} entries")]
    TooMany { field: String, max: usize },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Corrupt {collection} document: {reason}")]
    CorruptDocument { collection: String, reason: String },

    #[error("Storage error ({backend}): {reason}")]
    Storage { backend: String, reason: String },
}

/// Coarse classification of [`DomainError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied a value that violates a field rule
    Validation,
    /// Caller supplied a malformed identifier
    Format,
    /// Referenced entity does not exist
    NotFound,
    /// A stored document failed to decode or re-validate
    CorruptRecord,
    /// The backing store failed
    Storage,
}

impl DomainError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptDocument {
            collection: collection.into(),
            reason: reason.into(),
        }
    }

    pub fn storage(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Storage {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Required { .. }
            | Self::InvalidValue { .. }
            | Self::OutOfRange { .. }
            | Self::TooLong { .. }
            | Self::TooMany { .. } => ErrorKind::Validation,
            Self::InvalidFormat { .. } => ErrorKind::Format,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::CorruptDocument { .. } => ErrorKind::CorruptRecord,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Name of the offending field, for validation and format errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Required { field }
            | Self::InvalidValue { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::TooLong { field, .. }
            | Self::TooMany { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
