//! Crate-wide error model.

use thiserror::Error;

/// Errors produced by the cloud object wrappers.
///
/// Service failures are carried as rendered SDK error messages; the wrappers
/// add no retry or recovery logic of their own.
#[derive(Debug, Error)]
pub enum CloudObjectError {
    /// An operation requiring an ARN was called on an instance that has not
    /// been created (or adopted) yet.
    #[error("instance '{0}' not yet created")]
    NotYetCreated(String),

    #[error("invalid ARN '{arn}': {reason}")]
    InvalidArn { arn: String, reason: String },

    /// Policy document JSON could not be produced or understood.
    #[error("policy document JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IAM service error: {0}")]
    Iam(String),

    /// A successful IAM response was missing a field the wrapper needs.
    #[error("malformed IAM response: {0}")]
    MalformedResponse(String),
}

pub type CloudObjectResult<T> = Result<T, CloudObjectError>;
