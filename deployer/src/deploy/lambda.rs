//! AWS Lambda backend

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_lambda::config::Region;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::types::{Environment, FunctionCode, Runtime};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::deploy::backend::{
    BackendError, CreateFunctionParams, EventSourceMappingParams, FunctionApi, FunctionDescriptor,
};
use crate::settings::AwsSettings;

static SHARED_CLIENT: OnceCell<aws_sdk_lambda::Client> = OnceCell::const_new();

/// Get the process-wide Lambda client, building it on first use.
///
/// Settings passed after the first call are ignored.
pub async fn shared_client(settings: &AwsSettings) -> aws_sdk_lambda::Client {
    SHARED_CLIENT
        .get_or_init(|| async {
            info!("Initializing Lambda client (region: {:?})", settings.region);
            build_client(settings).await
        })
        .await
        .clone()
}

async fn build_client(settings: &AwsSettings) -> aws_sdk_lambda::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &settings.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    let config = loader.load().await;
    aws_sdk_lambda::Client::new(&config)
}

/// [`FunctionApi`] backed by the AWS Lambda control plane
#[derive(Clone)]
pub struct LambdaFunctionApi {
    client: aws_sdk_lambda::Client,
}

impl LambdaFunctionApi {
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }

    /// Use the shared client
    pub async fn from_settings(settings: &AwsSettings) -> Self {
        Self::new(shared_client(settings).await)
    }
}

fn classify<E, R>(error: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = error.code().map(str::to_string);
    BackendError::from_code(code.as_deref(), DisplayErrorContext(&error).to_string())
}

#[async_trait]
impl FunctionApi for LambdaFunctionApi {
    async fn get_function(&self, function: &str) -> Result<FunctionDescriptor, BackendError> {
        debug!("GetFunction {}", function);
        let output = self
            .client
            .get_function()
            .function_name(function)
            .send()
            .await
            .map_err(classify)?;

        let tags: BTreeMap<String, String> = output
            .tags()
            .map(|tags| tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let Some(config) = output.configuration() else {
            return Ok(FunctionDescriptor {
                arn: function.to_string(),
                tags,
                ..Default::default()
            });
        };

        Ok(FunctionDescriptor {
            arn: config.function_arn().unwrap_or(function).to_string(),
            name: config.function_name().unwrap_or_default().to_string(),
            memory_mb: config.memory_size().unwrap_or_default(),
            description: config.description().unwrap_or_default().to_string(),
            code_sha256: config.code_sha256().unwrap_or_default().to_string(),
            last_modified: config.last_modified().unwrap_or_default().to_string(),
            tags,
        })
    }

    async fn create_function(&self, params: CreateFunctionParams) -> Result<String, BackendError> {
        debug!("CreateFunction {} ({} MB)", params.name, params.memory_mb);
        let code = FunctionCode::builder()
            .s3_bucket(params.code.bucket)
            .s3_key(params.code.key)
            .build();
        let environment = Environment::builder()
            .set_variables(Some(params.environment.into_iter().collect()))
            .build();

        let output = self
            .client
            .create_function()
            .function_name(params.name)
            .runtime(Runtime::from(params.runtime.as_str()))
            .set_handler(params.handler)
            .set_role(params.role)
            .description(params.description)
            .memory_size(params.memory_mb)
            .code(code)
            .environment(environment)
            .publish(params.publish)
            .set_tags(Some(params.tags.into_iter().collect()))
            .send()
            .await
            .map_err(classify)?;

        output
            .function_arn()
            .map(str::to_string)
            .ok_or_else(|| BackendError::Other("CreateFunction response carried no ARN".to_string()))
    }

    async fn delete_function(&self, function: &str) -> Result<(), BackendError> {
        debug!("DeleteFunction {}", function);
        self.client
            .delete_function()
            .function_name(function)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn create_event_source_mapping(
        &self,
        params: EventSourceMappingParams,
    ) -> Result<String, BackendError> {
        debug!(
            "CreateEventSourceMapping {} -> {}",
            params.event_source_arn, params.function_name
        );
        let output = self
            .client
            .create_event_source_mapping()
            .event_source_arn(params.event_source_arn)
            .function_name(params.function_name)
            .enabled(params.enabled)
            .send()
            .await
            .map_err(classify)?;

        output.uuid().map(str::to_string).ok_or_else(|| {
            BackendError::Other("CreateEventSourceMapping response carried no UUID".to_string())
        })
    }

    async fn delete_event_source_mapping(&self, uuid: &str) -> Result<(), BackendError> {
        debug!("DeleteEventSourceMapping {}", uuid);
        self.client
            .delete_event_source_mapping()
            .uuid(uuid)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    fn client_version(&self) -> String {
        env!("AWS_SDK_LAMBDA_VERSION").to_string()
    }
}
