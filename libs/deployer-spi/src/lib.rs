//! Application deployer contract
//!
//! Types exchanged between a deployment orchestrator and a platform-specific
//! deployer. Nothing in here knows about a concrete backend.

pub mod models;

use async_trait::async_trait;

pub use models::{
    AppDefinition, AppDeploymentRequest, AppInstanceStatus, AppStatus, DeploymentState,
    RuntimeEnvironmentInfo,
};

/// Deployment property holding the optional group an app belongs to
pub const GROUP_PROPERTY_KEY: &str = "spring.cloud.deployer.group";

/// A platform capable of deploying, inspecting and removing applications
#[async_trait]
pub trait AppDeployer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deploy an app and return the opaque id the orchestrator must hand back
    async fn deploy(&self, request: &AppDeploymentRequest) -> Result<String, Self::Error>;

    /// Remove a deployed app. Removing an app that is already gone succeeds.
    async fn undeploy(&self, id: &str) -> Result<(), Self::Error>;

    /// Report the current status of an app
    async fn status(&self, id: &str) -> Result<AppStatus, Self::Error>;

    /// Describe the platform this deployer talks to
    fn environment_info(&self) -> RuntimeEnvironmentInfo;
}
