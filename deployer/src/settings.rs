//! Settings file management

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deploy::properties::DEFAULT_FUNCTION_MEMORY_MB;
use crate::errors::DeployerError;
use crate::logs::LogLevel;

/// Default settings file location
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/lambda-deployer/settings.json";

/// Deployer settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Also write daily log files here
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// AWS client configuration
    #[serde(default)]
    pub aws: AwsSettings,

    /// Defaults for created functions
    #[serde(default)]
    pub function: FunctionSettings,
}

/// AWS client settings. Unset values fall back to the SDK's default chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSettings {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,

    /// Endpoint override, e.g. a local emulator
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// Function defaults, overridable per deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSettings {
    #[serde(default = "default_runtime")]
    pub runtime: String,

    #[serde(default)]
    pub handler: Option<String>,

    /// Execution role ARN
    #[serde(default)]
    pub role: Option<String>,

    /// Memory in MB when a deployment gives none or an invalid one
    #[serde(default = "default_memory_mb")]
    pub memory_mb: i32,
}

fn default_runtime() -> String {
    "java21".to_string()
}

fn default_memory_mb() -> i32 {
    DEFAULT_FUNCTION_MEMORY_MB
}

impl Default for FunctionSettings {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            handler: None,
            role: None,
            memory_mb: default_memory_mb(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. A missing file yields the defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DeployerError> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, DeployerError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source
    pub fn with_overrides<F>(mut self, var: F) -> Result<Self, DeployerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = var("LAMBDA_DEPLOYER_LOG_LEVEL") {
            self.log_level = level.parse().map_err(DeployerError::ConfigError)?;
        }
        if let Some(region) = var("AWS_REGION") {
            self.aws.region = Some(region);
        }
        if let Some(role) = var("LAMBDA_DEPLOYER_ROLE") {
            self.function.role = Some(role);
        }
        Ok(self)
    }
}
