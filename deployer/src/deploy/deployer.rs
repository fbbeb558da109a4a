//! Lambda app deployer

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use deployer_spi::{AppDeployer, AppDeploymentRequest, AppStatus, RuntimeEnvironmentInfo};
use tracing::{debug, error, info, warn};

use crate::deploy::backend::{
    BackendError, CreateFunctionParams, EventSourceMappingParams, FunctionApi,
};
use crate::deploy::ids::{build_deployment_id, AppHandle, HANDLE_SEPARATOR};
use crate::deploy::properties::{
    code_location, function_memory, non_empty, EVENT_SOURCE_PROPERTY, FUNCTION_HANDLER_PROPERTY,
    FUNCTION_MEMORY_PROPERTY, FUNCTION_ROLE_PROPERTY, FUNCTION_RUNTIME_PROPERTY,
    GROUP_PROPERTY_KEY,
};
use crate::deploy::saga::DeploySaga;
use crate::deploy::status::{lookup, FunctionLookup, FunctionStatus};
use crate::errors::DeployerError;
use crate::settings::FunctionSettings;
use crate::telemetry::collect_host_info;
use crate::utils::version_info;

pub const PLATFORM_TYPE: &str = "AWS Lambda";
pub const IMPLEMENTATION_NAME: &str = "LambdaAppDeployer";

/// Deploys apps as Lambda functions
pub struct LambdaAppDeployer {
    api: Arc<dyn FunctionApi>,
    defaults: FunctionSettings,
}

impl LambdaAppDeployer {
    pub fn new(api: Arc<dyn FunctionApi>, defaults: FunctionSettings) -> Self {
        Self { api, defaults }
    }

    /// Create the function for an app and return its handle.
    ///
    /// Everything created before a failing step is removed again.
    pub async fn deploy_app(
        &self,
        request: &AppDeploymentRequest,
    ) -> Result<AppHandle, DeployerError> {
        let app_name = &request.definition.name;
        let deployment_id =
            build_deployment_id(request.deployment_property(GROUP_PROPERTY_KEY), app_name);
        info!("Starting deployment of app {}", deployment_id);

        if deployment_id.contains(HANDLE_SEPARATOR) {
            return Err(DeployerError::InvalidDeploymentId(deployment_id));
        }

        let event_source = non_empty(request, EVENT_SOURCE_PROPERTY).map(str::to_string);
        let params = self.create_function_params(request, &deployment_id, event_source.as_deref())?;

        let mut saga = DeploySaga::new(self.api.as_ref(), deployment_id.clone());
        let arn = saga.create_function(params).await?;
        debug!("Created function {} for {}", arn, deployment_id);

        match event_source {
            Some(source) => {
                let uuid = saga
                    .create_event_source_mapping(EventSourceMappingParams {
                        event_source_arn: source.clone(),
                        function_name: arn.clone(),
                        enabled: true,
                    })
                    .await?;
                info!("Wired {} to {} (mapping {})", source, arn, uuid);
            }
            None => debug!("No event source configured for {}", deployment_id),
        }

        saga.commit();
        let handle = AppHandle::new(deployment_id, arn);
        info!("Deployed app {}", handle);
        Ok(handle)
    }

    fn create_function_params(
        &self,
        request: &AppDeploymentRequest,
        deployment_id: &str,
        event_source: Option<&str>,
    ) -> Result<CreateFunctionParams, DeployerError> {
        let app_name = &request.definition.name;
        let code = code_location(request)?;
        let memory_mb = function_memory(
            request.deployment_property(FUNCTION_MEMORY_PROPERTY),
            self.defaults.memory_mb,
        );

        let runtime = non_empty(request, FUNCTION_RUNTIME_PROPERTY)
            .unwrap_or(self.defaults.runtime.as_str())
            .to_string();
        let handler = non_empty(request, FUNCTION_HANDLER_PROPERTY)
            .map(str::to_string)
            .or_else(|| self.defaults.handler.clone());
        let role = non_empty(request, FUNCTION_ROLE_PROPERTY)
            .map(str::to_string)
            .or_else(|| self.defaults.role.clone());
        if role.is_none() {
            warn!("No execution role configured for {}", deployment_id);
        }

        // destination is reserved for output stream wiring
        let tags = BTreeMap::from([
            ("deploymentId".to_string(), deployment_id.to_string()),
            ("source".to_string(), event_source.unwrap_or_default().to_string()),
            ("destination".to_string(), String::new()),
        ]);

        Ok(CreateFunctionParams {
            name: app_name.clone(),
            description: format!("{}-{}", app_name, deployment_id),
            runtime,
            handler,
            role,
            memory_mb,
            code,
            environment: request.definition.properties.clone(),
            tags,
            publish: true,
        })
    }

    /// Delete the function behind a handle, if it is there
    pub async fn undeploy_app(&self, handle: &AppHandle) -> Result<(), DeployerError> {
        let arn = &handle.native_id;
        match lookup(self.api.as_ref(), arn).await {
            FunctionLookup::Found(_) => self.delete_function(arn).await,
            FunctionLookup::NotFound => {
                info!("App {} is already undeployed", handle);
                Ok(())
            }
            FunctionLookup::Transient(e) => {
                warn!("Not undeploying {}, status unknown: {}", handle, e);
                Ok(())
            }
        }
    }

    async fn delete_function(&self, arn: &str) -> Result<(), DeployerError> {
        match self.api.delete_function(arn).await {
            Ok(()) => {
                info!("Deleted lambda with ARN {}", arn);
                Ok(())
            }
            Err(BackendError::NotFound(message)) => {
                warn!(
                    "Tried to delete a lambda that didn't exist with ARN {}: {}",
                    arn, message
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete lambda with ARN {}: {}", arn, e);
                Err(e.into())
            }
        }
    }

    /// Current status of the app behind a handle
    pub async fn app_status(&self, handle: &AppHandle) -> AppStatus {
        let status = FunctionStatus::fetch(self.api.as_ref(), &handle.native_id).await;
        AppStatus::new(handle.encode()).with_instance(status.to_instance_status())
    }

    /// Describe the Lambda platform
    pub fn runtime_environment_info(&self) -> RuntimeEnvironmentInfo {
        let host = collect_host_info();
        let version = version_info();
        RuntimeEnvironmentInfo {
            spi_class: "AppDeployer".to_string(),
            implementation_name: IMPLEMENTATION_NAME.to_string(),
            implementation_version: version.version,
            platform_type: PLATFORM_TYPE.to_string(),
            platform_api_version: host.os_string(),
            platform_client_version: format!("aws sdk version:{}", self.api.client_version()),
            platform_host_version: host.platform_string(),
            platform_specific_info: BTreeMap::from([
                ("gitHash".to_string(), version.git_hash),
                ("buildTime".to_string(), version.build_time),
            ]),
        }
    }
}

#[async_trait]
impl AppDeployer for LambdaAppDeployer {
    type Error = DeployerError;

    async fn deploy(&self, request: &AppDeploymentRequest) -> Result<String, DeployerError> {
        Ok(self.deploy_app(request).await?.encode())
    }

    async fn undeploy(&self, id: &str) -> Result<(), DeployerError> {
        let handle = AppHandle::decode(id)?;
        self.undeploy_app(&handle).await
    }

    async fn status(&self, id: &str) -> Result<AppStatus, DeployerError> {
        let handle = AppHandle::decode(id)?;
        Ok(self.app_status(&handle).await)
    }

    fn environment_info(&self) -> RuntimeEnvironmentInfo {
        self.runtime_environment_info()
    }
}
