//! Undeploy tests

use deployer_spi::AppDeployer;
use lambda_deployer::deploy::backend::BackendError;
use lambda_deployer::DeployerError;

use crate::fake_api::{deployer_with, Call, FakeFunctionApi, ARN};

fn handle() -> String {
    format!("batch-etl:{}", ARN)
}

#[tokio::test]
async fn test_undeploy_deletes_deployed_function() {
    let (deployer, api) = deployer_with(FakeFunctionApi::new());

    deployer.undeploy(&handle()).await.unwrap();
    assert_eq!(
        api.calls(),
        vec![
            Call::GetFunction(ARN.to_string()),
            Call::DeleteFunction(ARN.to_string())
        ]
    );
}

#[tokio::test]
async fn test_undeploy_of_undeployed_function_is_a_noop() {
    let api = FakeFunctionApi::new().failing_get(BackendError::NotFound("gone".to_string()));
    let (deployer, api) = deployer_with(api);

    deployer.undeploy(&handle()).await.unwrap();
    deployer.undeploy(&handle()).await.unwrap();
    assert!(api.deleted().is_empty());
}

#[tokio::test]
async fn test_undeploy_with_unknown_status_is_a_noop() {
    let api = FakeFunctionApi::new().failing_get(BackendError::Service("boom".to_string()));
    let (deployer, api) = deployer_with(api);

    deployer.undeploy(&handle()).await.unwrap();
    assert!(api.deleted().is_empty());
}

#[tokio::test]
async fn test_undeploy_tolerates_function_vanishing_before_delete() {
    let api = FakeFunctionApi::new().failing_delete(BackendError::NotFound("gone".to_string()));
    let (deployer, api) = deployer_with(api);

    deployer.undeploy(&handle()).await.unwrap();
    assert_eq!(api.deleted(), vec![ARN.to_string()]);
}

#[tokio::test]
async fn test_undeploy_surfaces_delete_faults() {
    for fault in [
        BackendError::TooManyRequests("rate exceeded".to_string()),
        BackendError::InvalidParameter("bad arn".to_string()),
        BackendError::Service("boom".to_string()),
    ] {
        let (deployer, _api) = deployer_with(FakeFunctionApi::new().failing_delete(fault.clone()));

        let err = deployer.undeploy(&handle()).await.unwrap_err();
        assert_eq!(err.backend(), Some(&fault));
    }
}

#[tokio::test]
async fn test_undeploy_rejects_malformed_handle() {
    let (deployer, api) = deployer_with(FakeFunctionApi::new());

    let err = deployer.undeploy("no-separator").await.unwrap_err();
    assert!(matches!(err, DeployerError::MalformedHandle(_)));
    assert!(api.calls().is_empty());
}
