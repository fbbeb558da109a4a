//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::deploy::backend::FunctionApi;
use crate::deploy::deployer::LambdaAppDeployer;
use crate::deploy::lambda::LambdaFunctionApi;
use crate::settings::Settings;

/// Main application state
pub struct AppState {
    /// Deployer backed by the shared Lambda client
    pub deployer: Arc<LambdaAppDeployer>,
}

impl AppState {
    /// Build the state against AWS Lambda
    pub async fn init(settings: &Settings) -> Self {
        info!("Initializing application state...");
        let api: Arc<dyn FunctionApi> =
            Arc::new(LambdaFunctionApi::from_settings(&settings.aws).await);
        Self::with_api(settings, api)
    }

    /// Build the state against any backend
    pub fn with_api(settings: &Settings, api: Arc<dyn FunctionApi>) -> Self {
        let deployer = Arc::new(LambdaAppDeployer::new(api, settings.function.clone()));
        Self { deployer }
    }
}
