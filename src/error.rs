//! Error types for CWL to Argo transpilation.
//!
//! Every stage of the transpiler returns a [`TranspileError`]. The variants
//! follow the failure kinds a caller needs to tell apart: a value that could
//! not be classified, a missing identifier, a type mismatch, a construct the
//! transpiler does not support yet, and plain validation failures.

use std::fmt;
use thiserror::Error;

/// The kind of a [`TranspileError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Classification,
    Lookup,
    TypeMismatch,
    Unsupported,
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Classification => "classification",
            ErrorKind::Lookup => "lookup",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// What a failed lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupTarget {
    /// A runtime input value for a declared input parameter
    Input,
    /// An external location for an input or output artifact
    Location,
    /// A requirement class in the tool's requirement list
    Requirement,
}

impl fmt::Display for LookupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupTarget::Input => "input",
            LookupTarget::Location => "location",
            LookupTarget::Requirement => "requirement",
        };
        f.write_str(name)
    }
}

/// Main error type for transpilation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranspileError {
    /// A runtime value matched none of the accepted input kinds
    #[error("Unable to classify input value: {message}")]
    Classification { message: String },

    /// A required identifier is absent from its map or list
    #[error("{target} `{name}` was not found")]
    NotFound { target: LookupTarget, name: String },

    /// A resolved value's kind is not among the declared type variants
    #[error("Type mismatch for `{name}`: {message}")]
    TypeMismatch { name: String, message: String },

    /// A construct reached a code path that only handles literals
    #[error("{construct} is not currently supported")]
    Unsupported { construct: String },

    /// A required field is absent or a value is malformed
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl TranspileError {
    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranspileError::Classification { .. } => ErrorKind::Classification,
            TranspileError::NotFound { .. } => ErrorKind::Lookup,
            TranspileError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            TranspileError::Unsupported { .. } => ErrorKind::Unsupported,
            TranspileError::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Whether this error marks a capability boundary rather than bad input.
    pub fn is_unsupported(&self) -> bool {
        self.kind() == ErrorKind::Unsupported
    }

    /// Create a classification error.
    pub fn classification(message: impl Into<String>) -> Self {
        TranspileError::Classification {
            message: message.into(),
        }
    }

    /// Create a lookup error.
    pub fn not_found(target: LookupTarget, name: impl Into<String>) -> Self {
        TranspileError::NotFound {
            target,
            name: name.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(name: impl Into<String>, message: impl Into<String>) -> Self {
        TranspileError::TypeMismatch {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-construct error.
    pub fn unsupported(construct: impl Into<String>) -> Self {
        TranspileError::Unsupported {
            construct: construct.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        TranspileError::Validation {
            message: message.into(),
        }
    }
}

/// Result type used throughout the transpiler.
pub type TranspileResult<T> = Result<T, TranspileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            TranspileError::classification("x").kind(),
            ErrorKind::Classification
        );
        assert_eq!(
            TranspileError::not_found(LookupTarget::Input, "msg").kind(),
            ErrorKind::Lookup
        );
        assert_eq!(
            TranspileError::type_mismatch("msg", "expected int").kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            TranspileError::validation("bad").kind(),
            ErrorKind::Validation
        );
        assert!(TranspileError::unsupported("expression glob").is_unsupported());
        assert!(!TranspileError::validation("bad").is_unsupported());
    }

    #[test]
    fn test_not_found_message() {
        let error = TranspileError::not_found(LookupTarget::Requirement, "DockerRequirement");
        assert_eq!(
            error.to_string(),
            "requirement `DockerRequirement` was not found"
        );
    }

    #[test]
    fn test_unsupported_message() {
        let error = TranspileError::unsupported("dockerFile");
        assert_eq!(error.to_string(), "dockerFile is not currently supported");
    }
}
