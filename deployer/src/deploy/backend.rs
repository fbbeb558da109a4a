//! Function management backend
//!
//! The deployer only talks to the cloud through [`FunctionApi`], so every
//! decision it makes can be exercised without a network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the function backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("too many requests: {0}")]
    TooManyRequests(String),

    #[error("invalid parameter value: {0}")]
    InvalidParameter(String),

    #[error("service fault: {0}")]
    Service(String),

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Classify a backend error by its error code
    pub fn from_code(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some("ResourceNotFoundException") => BackendError::NotFound(message),
            Some("TooManyRequestsException") => BackendError::TooManyRequests(message),
            Some("InvalidParameterValueException") => BackendError::InvalidParameter(message),
            Some("ServiceException") => BackendError::Service(message),
            _ => BackendError::Other(message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}

/// Object storage location of a staged function artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLocation {
    pub bucket: String,
    pub key: String,
}

/// Parameters of a create-function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunctionParams {
    pub name: String,
    pub description: String,
    pub runtime: String,
    pub handler: Option<String>,
    pub role: Option<String>,
    pub memory_mb: i32,
    pub code: CodeLocation,
    pub environment: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    pub publish: bool,
}

/// Parameters of a create-event-source-mapping call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSourceMappingParams {
    pub event_source_arn: String,
    pub function_name: String,
    pub enabled: bool,
}

/// Snapshot of a function as the backend describes it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub arn: String,
    pub name: String,
    pub memory_mb: i32,
    pub description: String,
    pub code_sha256: String,
    pub last_modified: String,
    pub tags: BTreeMap<String, String>,
}

/// Function management operations used by the deployer
#[async_trait]
pub trait FunctionApi: Send + Sync {
    /// Describe a function by name or ARN
    async fn get_function(&self, function: &str) -> Result<FunctionDescriptor, BackendError>;

    /// Create a function, returning its ARN
    async fn create_function(&self, params: CreateFunctionParams) -> Result<String, BackendError>;

    /// Delete a function by name or ARN
    async fn delete_function(&self, function: &str) -> Result<(), BackendError>;

    /// Link an event source to a function, returning the mapping id
    async fn create_event_source_mapping(
        &self,
        params: EventSourceMappingParams,
    ) -> Result<String, BackendError>;

    /// Remove an event source mapping
    async fn delete_event_source_mapping(&self, uuid: &str) -> Result<(), BackendError>;

    /// Backend client version, for environment reporting
    fn client_version(&self) -> String {
        "unknown".to_string()
    }
}
