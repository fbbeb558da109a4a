//! Function status lookup

use std::collections::BTreeMap;

use deployer_spi::{AppInstanceStatus, DeploymentState};
use tracing::{error, info};

use crate::deploy::backend::{BackendError, FunctionApi, FunctionDescriptor};
use crate::errors::DeployerError;

/// Outcome of asking the backend for a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionLookup {
    Found(FunctionDescriptor),
    NotFound,
    Transient(BackendError),
}

impl FunctionLookup {
    /// Deployment state this outcome stands for
    pub fn state(&self) -> DeploymentState {
        match self {
            FunctionLookup::Found(_) => DeploymentState::Deployed,
            FunctionLookup::NotFound => DeploymentState::Undeployed,
            FunctionLookup::Transient(_) => DeploymentState::Unknown,
        }
    }
}

/// Ask the backend for a function. Never fails, errors become outcomes.
pub async fn lookup(api: &dyn FunctionApi, arn: &str) -> FunctionLookup {
    match api.get_function(arn).await {
        Ok(descriptor) => {
            info!("Lambda definition found for ARN: {}", arn);
            FunctionLookup::Found(descriptor)
        }
        Err(BackendError::NotFound(message)) => {
            info!("Lambda not found with ARN: {} ({})", arn, message);
            FunctionLookup::NotFound
        }
        Err(e) => {
            error!("Unable to determine lambda status for ARN {}: {}", arn, e);
            FunctionLookup::Transient(e)
        }
    }
}

/// Status of one function, fixed at the time it was fetched
#[derive(Debug, Clone)]
pub struct FunctionStatus {
    arn: String,
    lookup: FunctionLookup,
}

impl FunctionStatus {
    /// Fetch the current status of a function
    pub async fn fetch(api: &dyn FunctionApi, arn: &str) -> Self {
        Self::from_lookup(arn, lookup(api, arn).await)
    }

    pub fn from_lookup(arn: impl Into<String>, lookup: FunctionLookup) -> Self {
        Self {
            arn: arn.into(),
            lookup,
        }
    }

    pub fn id(&self) -> &str {
        &self.arn
    }

    pub fn state(&self) -> DeploymentState {
        self.lookup.state()
    }

    pub fn descriptor(&self) -> Option<&FunctionDescriptor> {
        match &self.lookup {
            FunctionLookup::Found(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Flat view of the function configuration.
    ///
    /// Tag keys are dropped, only the values are listed.
    pub fn attributes(&self) -> Result<BTreeMap<String, String>, DeployerError> {
        let descriptor = self
            .descriptor()
            .ok_or_else(|| DeployerError::DescriptorUnavailable(self.arn.clone()))?;

        let tags = descriptor
            .tags
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");

        Ok(BTreeMap::from([
            ("arn".to_string(), descriptor.arn.clone()),
            ("name".to_string(), descriptor.name.clone()),
            ("memory".to_string(), descriptor.memory_mb.to_string()),
            ("description".to_string(), descriptor.description.clone()),
            ("codeSha256".to_string(), descriptor.code_sha256.clone()),
            ("lastModified".to_string(), descriptor.last_modified.clone()),
            ("tags".to_string(), tags),
        ]))
    }

    /// Instance status for the orchestrator
    pub fn to_instance_status(&self) -> AppInstanceStatus {
        AppInstanceStatus {
            id: self.arn.clone(),
            state: self.state(),
            attributes: self.attributes().unwrap_or_default(),
        }
    }
}
