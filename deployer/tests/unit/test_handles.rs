//! Handle round-trip tests

use lambda_deployer::deploy::ids::{build_deployment_id, AppHandle};

#[test]
fn test_handles_roundtrip_for_separator_free_ids() {
    let groups = [None, Some("batch"), Some("a-b")];
    let apps = ["etl", "ingest-orders", "x"];
    let native_ids = [
        "fn",
        "arn:aws:lambda:us-east-1:123456789012:function:etl",
        "arn:aws:lambda:us-east-1:123456789012:function:etl:7",
    ];

    for group in groups {
        for app in apps {
            for native_id in native_ids {
                let deployment_id = build_deployment_id(group, app);
                let encoded = AppHandle::new(deployment_id.clone(), native_id).encode();

                let decoded = AppHandle::decode(&encoded).unwrap();
                assert_eq!(decoded.deployment_id, deployment_id);
                assert_eq!(decoded.native_id, native_id);
            }
        }
    }
}
