//! Error model shared by the data map and the descriptor layer.

use thiserror::Error;

/// Result type returned by the fail-fast data map accessors.
pub type DataMapResult<T> = Result<T, DataMapError>;

/// Failure raised by a fail-fast data map getter.
///
/// The `try_*` accessors swallow every variant of this enum and report a
/// missing value instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataMapError {
    /// No entry exists under the requested key.
    #[error("no entry for key '{key}'")]
    MissingKey { key: String },

    /// A string-stored value could not be parsed into the requested type.
    #[error("value '{value}' under key '{key}' is not a valid {expected}")]
    Format {
        key: String,
        expected: &'static str,
        value: String,
    },

    /// A natively stored value has a different type than the one requested.
    #[error("value under key '{key}' is {actual}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl DataMapError {
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    pub fn format(key: impl Into<String>, expected: &'static str, value: impl Into<String>) -> Self {
        Self::Format {
            key: key.into(),
            expected,
            value: value.into(),
        }
    }

    pub fn type_mismatch(key: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            actual,
        }
    }

    /// The key the failing lookup was made with.
    pub fn key(&self) -> &str {
        match self {
            DataMapError::MissingKey { key }
            | DataMapError::Format { key, .. }
            | DataMapError::TypeMismatch { key, .. } => key,
        }
    }
}

/// A job identity that cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("job name must not be blank")]
    BlankName,
}

/// Errors raised by consumers of job descriptors (scheduling engines, stores).
///
/// Nothing in this workspace returns these; they are defined here so engines
/// built on top share one vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    /// A descriptor with the same identity is already registered.
    #[error("job identity conflict: {key}")]
    IdentityConflict { key: String },

    /// A data map access failed while preparing an execution.
    #[error(transparent)]
    DataMap(#[from] DataMapError),
}

impl JobError {
    pub fn identity_conflict(key: impl core::fmt::Display) -> Self {
        Self::IdentityConflict { key: key.to_string() }
    }
}
