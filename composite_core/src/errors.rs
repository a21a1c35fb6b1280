//! # Error Types
//!
//! Structured error types for composite_core. Errors fall into two classes:
//!
//! - **Client errors** (`InvalidInput`, `MissingField`, `InvalidLayup`,
//!   `SerializationError`): the request itself is malformed or out of range.
//! - **Server errors** (`SingularMatrix` and the rest): the request was
//!   well-formed but the computation could not proceed.
//!
//! Computations are deterministic, so neither class is retryable.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(layer_thickness: f64) -> CalcResult<()> {
//!     if layer_thickness <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "layer_thickness",
//!             layer_thickness.to_string(),
//!             "Layer thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = validate_thickness(-0.1).unwrap_err();
//! assert_eq!(err.http_status(), 422);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for composite_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing from a request
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A layup sequence string could not be expanded
    #[error("Invalid layup sequence '{sequence}': {reason}")]
    InvalidLayup { sequence: String, reason: String },

    /// A matrix required by the computation cannot be inverted
    #[error("Matrix {matrix} is singular and cannot be inverted ({context})")]
    SingularMatrix { matrix: String, context: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch in a response document
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidLayup error
    pub fn invalid_layup(sequence: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidLayup {
            sequence: sequence.into(),
            reason: reason.into(),
        }
    }

    /// Create a SingularMatrix error
    pub fn singular_matrix(matrix: impl Into<String>, context: impl Into<String>) -> Self {
        CalcError::SingularMatrix {
            matrix: matrix.into(),
            context: context.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the request contents rather than the computation.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::InvalidLayup { .. }
                | CalcError::SerializationError { .. }
        )
    }

    /// HTTP-style status for the response envelope: 422 for client errors, 500 otherwise.
    pub fn http_status(&self) -> u16 {
        if self.is_client_error() {
            422
        } else {
            500
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidLayup { .. } => "INVALID_LAYUP",
            CalcError::SingularMatrix { .. } => "SINGULAR_MATRIX",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json reports absent keys as "missing field `name` at line .."
        let message = e.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some(field) = rest.split('`').next() {
                return CalcError::missing_field(field);
            }
        }
        CalcError::SerializationError { reason: message }
    }
}
