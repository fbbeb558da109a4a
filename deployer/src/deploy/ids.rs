//! Deployment ids and app handles

use std::fmt;
use std::str::FromStr;

use crate::errors::DeployerError;

/// Separator between the deployment id and the function ARN in a handle
pub const HANDLE_SEPARATOR: char = ':';

/// Build the human-readable deployment id for an app
pub fn build_deployment_id(group: Option<&str>, app_name: &str) -> String {
    match group {
        Some(group) => format!("{}-{}", group, app_name),
        None => app_name.to_string(),
    }
}

/// Id handed to the orchestrator for a deployed function.
///
/// Rendered as `<deploymentId>:<functionArn>`. ARNs contain `:` themselves,
/// so parsing splits on the first separator only and the deployment id may
/// never contain one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppHandle {
    pub deployment_id: String,
    pub native_id: String,
}

impl AppHandle {
    pub fn new(deployment_id: impl Into<String>, native_id: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            native_id: native_id.into(),
        }
    }

    /// Render the handle for the orchestrator
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parse a handle previously returned by [`AppHandle::encode`]
    pub fn decode(handle: &str) -> Result<Self, DeployerError> {
        match handle.split_once(HANDLE_SEPARATOR) {
            Some((deployment_id, native_id))
                if !deployment_id.is_empty() && !native_id.is_empty() =>
            {
                Ok(Self::new(deployment_id, native_id))
            }
            _ => Err(DeployerError::MalformedHandle(handle.to_string())),
        }
    }
}

impl fmt::Display for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.deployment_id, HANDLE_SEPARATOR, self.native_id)
    }
}

impl FromStr for AppHandle {
    type Err = DeployerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
