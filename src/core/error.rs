//! Error types for Veriform.
//!
//! Uses thiserror for structured errors with context. The taxonomy keeps
//! the channels distinct: a check that legitimately fails produces a
//! `Danger` outcome, not an error; only a rejected pending operation,
//! invocation misuse, or a configuration problem surfaces here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A check's pending operation rejected instead of settling to a result.
///
/// This is the "errored" channel: it is never coerced into a `Danger`
/// outcome, the affected pipeline writes nothing to the cache, and the
/// commit path never proceeds on it.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("check '{check}' on field '{field}' errored: {message}")]
pub struct CheckFailure {
    /// Owning field name.
    pub field: String,
    /// Check id whose operation rejected.
    pub check: String,
    /// Failure payload.
    pub message: String,
}

impl CheckFailure {
    /// Build a failure payload.
    pub fn new(
        field: impl Into<String>,
        check: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            check: check.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced while validating a field or form.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidateError {
    /// Invocation misuse: the named field is not part of this form.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A check execution error (rejected pending operation).
    #[error(transparent)]
    Check(#[from] CheckFailure),
}

/// Errors from the submit-gate path.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmitError {
    /// Full-form validation errored; the commit never proceeds.
    #[error("validation errored during submit: {0}")]
    Validation(#[from] ValidateError),
}

/// Top-level error type for Veriform.
#[derive(Error, Debug)]
pub enum VeriformError {
    /// Validation error.
    #[error("validation error: {0}")]
    Validate(#[from] ValidateError),

    /// Submit-gate error.
    #[error("submit error: {0}")]
    Submit(#[from] SubmitError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for validation operations.
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Result type alias for Veriform operations.
pub type VeriformResult<T> = Result<T, VeriformError>;
