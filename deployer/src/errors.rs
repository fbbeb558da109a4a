//! Error types for the Lambda deployer

use thiserror::Error;

use crate::deploy::backend::BackendError;
use crate::deploy::properties::{S3_BUCKET_PROPERTY, S3_KEY_PROPERTY};

/// Main error type for the deployer
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("{} and {} for function source code required", S3_BUCKET_PROPERTY, S3_KEY_PROPERTY)]
    MissingArtifactLocation,

    #[error("Invalid deployment id '{0}': must not contain ':'")]
    InvalidDeploymentId(String),

    #[error("Malformed app id '{0}': expected <deploymentId>:<functionArn>")]
    MalformedHandle(String),

    #[error("Function descriptor unavailable for {0}")]
    DescriptorUnavailable(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl DeployerError {
    /// The backend error behind this error, if any
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            DeployerError::Backend(e) => Some(e),
            _ => None,
        }
    }
}
