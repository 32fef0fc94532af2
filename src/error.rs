//! Error types for the client.
//!
//! Every failure is user-visible and non-fatal: operations catch these
//! at their boundary and convert them into an error-styled status
//! message. Nothing here is ever propagated past the controller.

use std::time::Duration;

use thiserror::Error;

/// Input validation failures, rejected before any backend call is made.
/// The display strings are the messages shown to the user as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a file to upload")]
    MissingFile,

    #[error("File size exceeds maximum allowed size of {limit}")]
    FileTooLarge { limit: String },

    #[error("Content type '{content_type}' is not allowed. Allowed types: {allowed}")]
    DisallowedType { content_type: String, allowed: String },

    #[error("Please fill in all required fields")]
    MissingFields,

    #[error("Please fill in all fields with valid values")]
    InvalidNodeFields,

    #[error("Please enter a content ID")]
    MissingContentId,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Bootstrap failure. Surfaced once by session setup and blocks
    /// every backend-dependent operation.
    #[error("initialization failed: {0}")]
    Init(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failure during an issued operation, including file I/O and
    /// error replies from the backend.
    #[error("{0}")]
    Operation(String),

    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("request cancelled")]
    Cancelled,

    #[error("backend connection closed")]
    BackendClosed,
}
