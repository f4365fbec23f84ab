//! Error types for the deployer

use std::time::Duration;

use thiserror::Error;

/// Main error type for a deployment
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Existence probe or change set description failed unexpectedly
    #[error("Probe error: {0}")]
    Probe(String),

    /// Change set creation or execution was rejected by the service
    #[error("Submission error: {0}")]
    Submission(String),

    /// Change set creation wait failed and the change set is not empty
    #[error("Change set error: changeset is not empty but waiting for changeset completion still timed out. Error was: {0}")]
    CreationTimeout(String),

    #[error("Convergence error: retry ceiling of {ceiling:?} exceeded, last reason: {last_reason}")]
    CeilingExceeded {
        ceiling: Duration,
        last_reason: String,
    },

    #[error("Convergence error: {0}")]
    FatalStatus(String),

    #[error("Deployment cancelled: {0}")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployError {
    /// Whether the error is the caller's cancellation rather than a deployment failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeployError::Cancelled(_))
    }
}

impl From<anyhow::Error> for DeployError {
    fn from(err: anyhow::Error) -> Self {
        DeployError::Internal(err.to_string())
    }
}
