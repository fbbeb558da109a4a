//! Deployment properties understood by the Lambda deployer

use deployer_spi::AppDeploymentRequest;
use tracing::warn;

use crate::deploy::backend::CodeLocation;
use crate::errors::DeployerError;

pub use deployer_spi::GROUP_PROPERTY_KEY;

/// Bucket holding the staged function artifact (required)
pub const S3_BUCKET_PROPERTY: &str = "s3.bucket";

/// Object key of the staged function artifact (required)
pub const S3_KEY_PROPERTY: &str = "s3.key";

/// Function memory in MB
pub const FUNCTION_MEMORY_PROPERTY: &str = "app.function.memory";

/// Function runtime identifier, e.g. `java21`
pub const FUNCTION_RUNTIME_PROPERTY: &str = "app.function.runtime";

/// Function handler entry point
pub const FUNCTION_HANDLER_PROPERTY: &str = "app.function.handler";

/// Execution role ARN
pub const FUNCTION_ROLE_PROPERTY: &str = "app.function.role";

/// ARN of an upstream stream to wire to the function
pub const EVENT_SOURCE_PROPERTY: &str = "app.function.event-source";

/// Lambda's smallest memory setting, used when none or a bad one is given
pub const DEFAULT_FUNCTION_MEMORY_MB: i32 = 128;

/// Resolve the function memory, falling back to `fallback_mb`
pub fn function_memory(memory: Option<&str>, fallback_mb: i32) -> i32 {
    let Some(memory) = memory else {
        return fallback_mb;
    };

    match memory.trim().parse::<i32>() {
        Ok(mb) if mb > 0 => mb,
        Ok(_) => {
            warn!(
                "Invalid function memory specified: '{}', defaulting to {}MB",
                memory, fallback_mb
            );
            fallback_mb
        }
        Err(e) => {
            warn!(
                "Invalid function memory specified: '{}' ({}), defaulting to {}MB",
                memory, e, fallback_mb
            );
            fallback_mb
        }
    }
}

/// Artifact location, both bucket and key are required
pub fn code_location(request: &AppDeploymentRequest) -> Result<CodeLocation, DeployerError> {
    match (
        request.deployment_property(S3_BUCKET_PROPERTY),
        request.deployment_property(S3_KEY_PROPERTY),
    ) {
        (Some(bucket), Some(key)) => Ok(CodeLocation {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }),
        _ => Err(DeployerError::MissingArtifactLocation),
    }
}

/// Non-empty deployment property
pub fn non_empty<'a>(request: &'a AppDeploymentRequest, key: &str) -> Option<&'a str> {
    request
        .deployment_property(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
