//! Error types for scout.

use thiserror::Error;
use uuid::Uuid;

use crate::models::JobStatus;
use crate::validation::ValidationError;

/// Result type alias using scout's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for scout operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad submission parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Illegal state change attempted on a job
    #[error("Invalid transition: job {job_id} is already {status}")]
    InvalidTransition { job_id: Uuid, status: JobStatus },

    /// Insight data violated a model invariant
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// External research collaborator errored or timed out
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// Job was cancelled before it completed
    #[error("Job cancelled: {0}")]
    Cancelled(Uuid),

    /// Requested export encoding is not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Job not found
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
