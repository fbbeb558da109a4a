//! Deployer contract models

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Definition of the app to deploy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinition {
    /// App name
    pub name: String,

    /// Free-form app properties
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl AppDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }
}

/// A request to deploy one app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDeploymentRequest {
    pub definition: AppDefinition,

    /// Artifact reference, if the orchestrator resolved one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    /// Platform specific deployment settings
    #[serde(default)]
    pub deployment_properties: BTreeMap<String, String>,
}

impl AppDeploymentRequest {
    pub fn new(definition: AppDefinition) -> Self {
        Self {
            definition,
            resource: None,
            deployment_properties: BTreeMap::new(),
        }
    }

    /// Add a deployment property
    pub fn with_deployment_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.deployment_properties.insert(key.into(), value.into());
        self
    }

    /// Look up a deployment property
    pub fn deployment_property(&self, key: &str) -> Option<&str> {
        self.deployment_properties.get(key).map(String::as_str)
    }
}

/// Deployment state of an app or app instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    /// The app exists on the platform
    Deployed,

    /// The platform has no record of the app
    Undeployed,

    /// The platform could not be asked
    Unknown,
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentState::Deployed => "deployed",
            DeploymentState::Undeployed => "undeployed",
            DeploymentState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Status of a single running instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstanceStatus {
    pub id: String,
    pub state: DeploymentState,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Status of a deployed app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    pub deployment_id: String,
    #[serde(default)]
    pub instances: Vec<AppInstanceStatus>,
}

impl AppStatus {
    pub fn new(deployment_id: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            instances: Vec::new(),
        }
    }

    pub fn with_instance(mut self, instance: AppInstanceStatus) -> Self {
        self.instances.push(instance);
        self
    }

    /// Aggregate state: all instances must agree, no instances is unknown
    pub fn state(&self) -> DeploymentState {
        let mut states = self.instances.iter().map(|i| i.state);
        match states.next() {
            None => DeploymentState::Unknown,
            Some(first) if states.all(|s| s == first) => first,
            Some(_) => DeploymentState::Unknown,
        }
    }
}

/// Platform information reported by a deployer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnvironmentInfo {
    pub spi_class: String,
    pub implementation_name: String,
    pub implementation_version: String,
    pub platform_type: String,
    pub platform_api_version: String,
    pub platform_client_version: String,
    pub platform_host_version: String,
    #[serde(default)]
    pub platform_specific_info: BTreeMap<String, String>,
}
