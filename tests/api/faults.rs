//! tests/api/faults.rs
use crate::helpers::spawn_service;
use tarpc::context;
use wordpipe::location::ObjectLocation;
use wordpipe::service::FaultKind;
use wordpipe::storage::ObjectStore;

#[tokio::test]
async fn a_malformed_source_location_should_surface_as_invalid_location() {
    let app = spawn_service().await;

    let fault = app
        .client
        .split(context::current(), "file:///tmp/input.txt".to_string(), None)
        .await
        .expect("Failed to reach the service")
        .expect_err("Split should have failed");

    assert_eq!(fault.kind, FaultKind::InvalidLocation);
}

#[tokio::test]
async fn a_missing_source_should_surface_as_a_storage_read_failure() {
    let app = spawn_service().await;

    let fault = app
        .client
        .split(context::current(), "s3://corpus/nowhere.txt".to_string(), None)
        .await
        .expect("Failed to reach the service")
        .expect_err("Split should have failed");

    assert_eq!(fault.kind, FaultKind::StorageRead);
}

#[tokio::test]
async fn an_empty_reduce_request_should_surface_as_invalid_location() {
    let app = spawn_service().await;

    let fault = app
        .client
        .reduce(context::current(), Vec::new())
        .await
        .expect("Failed to reach the service")
        .expect_err("Reduce should have failed");

    assert_eq!(fault.kind, FaultKind::InvalidLocation);
}

#[tokio::test]
async fn a_malformed_partial_should_fail_the_reduction_and_write_nothing() {
    let app = spawn_service().await;
    let partial: ObjectLocation = "s3://corpus/maps/chunk-0.json".parse().unwrap();
    app.store
        .put(&partial, b"[1,2,3]", "application/json")
        .await
        .expect("Failed to seed partial");

    let fault = app
        .client
        .reduce(context::current(), vec![partial.to_string()])
        .await
        .expect("Failed to reach the service")
        .expect_err("Reduce should have failed");

    assert_eq!(fault.kind, FaultKind::MalformedPartial);
    assert!(fault.message.contains("maps/chunk-0.json"));
    assert!(!app.store.contains(&partial.with_key("final/result.json")));
}
