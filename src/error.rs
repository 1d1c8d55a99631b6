//! Error types for condensar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for condensar operations.
///
/// Provides detailed context about failures including shape mismatches,
/// missing cached artifacts, and model compilation failures.
///
/// # Examples
///
/// ```
/// use condensar::error::CondensarError;
///
/// let err = CondensarError::DimensionMismatch {
///     expected: "100 outcomes".to_string(),
///     actual: "95".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum CondensarError {
    /// Input lengths or array shapes don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid configuration parameter value provided.
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// No persisted artifact exists under the requested cache key.
    ArtifactNotFound {
        /// Fingerprint-derived cache key
        key: u64,
    },

    /// The external model compiler rejected the source text.
    CompileFailure {
        /// Compiler diagnostic, passed through unmodified
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CondensarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CondensarError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            CondensarError::InvalidParameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter: {param} = {value}, expected {constraint}"
                )
            }
            CondensarError::ArtifactNotFound { key } => {
                write!(f, "No cached model artifact under key {key}")
            }
            CondensarError::CompileFailure { message } => {
                write!(f, "Model compilation failed: {message}")
            }
            CondensarError::Io(e) => write!(f, "I/O error: {e}"),
            CondensarError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            CondensarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CondensarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CondensarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CondensarError {
    fn from(err: std::io::Error) -> Self {
        CondensarError::Io(err)
    }
}

impl From<&str> for CondensarError {
    fn from(msg: &str) -> Self {
        CondensarError::Other(msg.to_string())
    }
}

impl From<String> for CondensarError {
    fn from(msg: String) -> Self {
        CondensarError::Other(msg)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CondensarError>;
