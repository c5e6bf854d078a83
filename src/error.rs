//! Error handling module
//!
//! Provides the error taxonomy shared by the schema-build and runtime phases.

use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Type mismatch on field {field}: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Schema conflict: node type {identifier} under {owner} already registered with different fields")]
    SchemaConflict { owner: String, identifier: String },

    #[error("Registry is frozen: cannot register {identifier} under {owner}")]
    RegistryFrozen { owner: String, identifier: String },
}

impl SyncError {
    /// Stable code used in structured log fields
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::InvalidArgument(_) => "INVALID_ARGUMENT",
            SyncError::TypeMismatch { .. } => "TYPE_MISMATCH",
            SyncError::SchemaConflict { .. } => "SCHEMA_CONFLICT",
            SyncError::RegistryFrozen { .. } => "REGISTRY_FROZEN",
        }
    }

    /// Whether the schema-build phase may continue after this error.
    ///
    /// A conflicting or frozen registry cannot be used safely later, so those
    /// abort the whole phase.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidArgument(_) | SyncError::TypeMismatch { .. }
        )
    }
}

/// Result type alias for engine operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Helper function to create an invalid argument error
pub fn invalid_argument(msg: impl Into<String>) -> SyncError {
    SyncError::InvalidArgument(msg.into())
}

/// Helper function to create a type mismatch error
pub fn type_mismatch(
    field: impl Into<String>,
    expected: impl std::fmt::Display,
    found: impl std::fmt::Display,
) -> SyncError {
    SyncError::TypeMismatch {
        field: field.into(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
