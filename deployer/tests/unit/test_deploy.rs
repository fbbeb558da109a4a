//! Deploy tests

use std::collections::BTreeMap;

use deployer_spi::{AppDefinition, AppDeployer, AppDeploymentRequest, GROUP_PROPERTY_KEY};
use lambda_deployer::deploy::backend::{BackendError, CodeLocation, EventSourceMappingParams};
use lambda_deployer::deploy::properties::{
    EVENT_SOURCE_PROPERTY, FUNCTION_MEMORY_PROPERTY, FUNCTION_ROLE_PROPERTY, S3_BUCKET_PROPERTY,
    S3_KEY_PROPERTY,
};
use lambda_deployer::settings::FunctionSettings;
use lambda_deployer::DeployerError;

use crate::fake_api::{
    deployer_with, deployer_with_defaults, Call, FakeFunctionApi, ARN, MAPPING_UUID,
};

const STREAM_ARN: &str = "arn:aws:kinesis:eu-west-1:123456789012:stream/orders";

fn etl_request() -> AppDeploymentRequest {
    let mut definition = AppDefinition::new("etl");
    definition
        .properties
        .insert("LOG_LEVEL".to_string(), "debug".to_string());

    AppDeploymentRequest::new(definition)
        .with_deployment_property(GROUP_PROPERTY_KEY, "batch")
        .with_deployment_property(S3_BUCKET_PROPERTY, "b")
        .with_deployment_property(S3_KEY_PROPERTY, "k")
        .with_deployment_property(FUNCTION_MEMORY_PROPERTY, "512")
}

#[tokio::test]
async fn test_deploy_end_to_end() {
    let (deployer, api) = deployer_with(FakeFunctionApi::new());

    let id = deployer.deploy(&etl_request()).await.unwrap();
    assert_eq!(id, format!("batch-etl:{}", ARN));

    let created = api.created();
    assert_eq!(created.len(), 1);
    let params = &created[0];
    assert_eq!(params.name, "etl");
    assert_eq!(params.description, "etl-batch-etl");
    assert_eq!(params.memory_mb, 512);
    assert_eq!(params.runtime, "java21");
    assert!(params.publish);
    assert_eq!(
        params.code,
        CodeLocation {
            bucket: "b".to_string(),
            key: "k".to_string()
        }
    );
    assert_eq!(
        params.environment,
        BTreeMap::from([("LOG_LEVEL".to_string(), "debug".to_string())])
    );
    assert_eq!(params.tags["deploymentId"], "batch-etl");
    assert_eq!(params.tags["source"], "");
    assert_eq!(params.tags["destination"], "");

    // no event source given, so no mapping is attempted
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_deploy_without_group_uses_app_name() {
    let (deployer, _api) = deployer_with(FakeFunctionApi::new());
    let request = AppDeploymentRequest::new(AppDefinition::new("etl"))
        .with_deployment_property(S3_BUCKET_PROPERTY, "b")
        .with_deployment_property(S3_KEY_PROPERTY, "k");

    let handle = deployer.deploy_app(&request).await.unwrap();
    assert_eq!(handle.deployment_id, "etl");
    assert_eq!(handle.native_id, ARN);
}

#[tokio::test]
async fn test_deploy_requires_artifact_location() {
    for missing in [S3_BUCKET_PROPERTY, S3_KEY_PROPERTY] {
        let (deployer, api) = deployer_with(FakeFunctionApi::new());
        let mut request = etl_request();
        request.deployment_properties.remove(missing);

        let err = deployer.deploy(&request).await.unwrap_err();
        assert!(matches!(err, DeployerError::MissingArtifactLocation));
        assert!(api.calls().is_empty());
    }
}

#[tokio::test]
async fn test_deploy_bad_memory_falls_back_to_default() {
    let (deployer, api) = deployer_with(FakeFunctionApi::new());
    let request = etl_request().with_deployment_property(FUNCTION_MEMORY_PROPERTY, "lots");

    deployer.deploy(&request).await.unwrap();
    assert_eq!(api.created()[0].memory_mb, 128);
}

#[tokio::test]
async fn test_deploy_memory_falls_back_to_configured_default() {
    let defaults = FunctionSettings {
        memory_mb: 1024,
        ..Default::default()
    };
    let (deployer, api) = deployer_with_defaults(FakeFunctionApi::new(), defaults);

    let mut request = etl_request();
    request.deployment_properties.remove(FUNCTION_MEMORY_PROPERTY);
    deployer.deploy(&request).await.unwrap();

    let request = etl_request().with_deployment_property(FUNCTION_MEMORY_PROPERTY, "lots");
    deployer.deploy(&request).await.unwrap();

    let request = etl_request().with_deployment_property(FUNCTION_MEMORY_PROPERTY, "256");
    deployer.deploy(&request).await.unwrap();

    let memory: Vec<i32> = api.created().iter().map(|p| p.memory_mb).collect();
    assert_eq!(memory, vec![1024, 1024, 256]);
}

#[tokio::test]
async fn test_deploy_rejects_separator_in_deployment_id() {
    let (deployer, api) = deployer_with(FakeFunctionApi::new());
    let request = etl_request().with_deployment_property(GROUP_PROPERTY_KEY, "team:a");

    let err = deployer.deploy(&request).await.unwrap_err();
    assert!(matches!(err, DeployerError::InvalidDeploymentId(ref id) if id == "team:a-etl"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_deploy_uses_role_from_properties() {
    let (deployer, api) = deployer_with(FakeFunctionApi::new());
    let request = etl_request()
        .with_deployment_property(FUNCTION_ROLE_PROPERTY, "arn:aws:iam::123456789012:role/etl");

    deployer.deploy(&request).await.unwrap();
    assert_eq!(
        api.created()[0].role.as_deref(),
        Some("arn:aws:iam::123456789012:role/etl")
    );
}

#[tokio::test]
async fn test_deploy_wires_explicit_event_source() {
    let (deployer, api) = deployer_with(FakeFunctionApi::new());
    let request = etl_request().with_deployment_property(EVENT_SOURCE_PROPERTY, STREAM_ARN);

    deployer.deploy(&request).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        Call::CreateEventSourceMapping(EventSourceMappingParams {
            event_source_arn: STREAM_ARN.to_string(),
            function_name: ARN.to_string(),
            enabled: true,
        })
    );
    assert_eq!(api.created()[0].tags["source"], STREAM_ARN);
}

#[tokio::test]
async fn test_deploy_rolls_back_function_when_mapping_fails() {
    let api = FakeFunctionApi::new()
        .failing_mapping(BackendError::InvalidParameter("unknown stream".to_string()));
    let (deployer, api) = deployer_with(api);
    let request = etl_request().with_deployment_property(EVENT_SOURCE_PROPERTY, STREAM_ARN);

    let err = deployer.deploy(&request).await.unwrap_err();
    assert!(matches!(
        err.backend(),
        Some(BackendError::InvalidParameter(_))
    ));

    // the function created before the failure is gone again
    assert_eq!(api.deleted(), vec![ARN.to_string()]);
    assert!(!api
        .calls()
        .iter()
        .any(|call| call == &Call::DeleteEventSourceMapping(MAPPING_UUID.to_string())));
}

#[tokio::test]
async fn test_deploy_failed_rollback_keeps_original_error() {
    let api = FakeFunctionApi::new()
        .failing_mapping(BackendError::InvalidParameter("stream".to_string()))
        .failing_delete(BackendError::Service("internal failure".to_string()));
    let (deployer, api) = deployer_with(api);
    let request = etl_request().with_deployment_property(EVENT_SOURCE_PROPERTY, STREAM_ARN);

    let err = deployer.deploy(&request).await.unwrap_err();
    assert!(matches!(
        err,
        DeployerError::Backend(BackendError::InvalidParameter(ref msg)) if msg == "stream"
    ));

    // the undo was attempted even though it failed
    assert_eq!(api.deleted(), vec![ARN.to_string()]);
    assert!(matches!(api.calls().last(), Some(Call::DeleteFunction(_))));
}

#[tokio::test]
async fn test_deploy_create_failure_leaves_nothing_to_undo() {
    let api = FakeFunctionApi::new()
        .failing_create(BackendError::TooManyRequests("rate exceeded".to_string()));
    let (deployer, api) = deployer_with(api);

    let err = deployer.deploy(&etl_request()).await.unwrap_err();
    assert!(matches!(err, DeployerError::Backend(BackendError::TooManyRequests(_))));
    assert_eq!(api.calls().len(), 1);
    assert!(api.deleted().is_empty());
}
