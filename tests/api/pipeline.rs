//! tests/api/pipeline.rs
use crate::helpers::spawn_service;
use claims::assert_ok;
use std::collections::BTreeMap;
use tarpc::context;
use wordpipe::location::ObjectLocation;
use wordpipe::storage::ObjectStore;

#[tokio::test]
async fn health_should_answer_true() {
    let app = spawn_service().await;

    let healthy = app
        .client
        .health(context::current())
        .await
        .expect("Failed to reach the service");

    assert!(healthy);
}

#[tokio::test]
async fn the_three_stages_should_produce_the_expected_aggregate() {
    let app = spawn_service().await;
    let source: ObjectLocation = "s3://corpus/input.txt".parse().unwrap();
    app.store
        .put(&source, b"The cat sat.\nThe dog ran.", "text/plain")
        .await
        .expect("Failed to seed source");

    let chunks = app
        .client
        .split(context::current(), source.to_string(), Some(2))
        .await
        .expect("Failed to reach the service")
        .expect("Split failed");
    assert_eq!(
        chunks,
        vec![
            "s3://corpus/chunks/chunk-0.txt".to_string(),
            "s3://corpus/chunks/chunk-1.txt".to_string(),
        ]
    );

    let mut partials = Vec::new();
    for chunk in &chunks {
        let partial = app
            .client
            .map_chunk(context::current(), chunk.clone())
            .await
            .expect("Failed to reach the service")
            .expect("Map failed");
        partials.push(partial);
    }
    assert_eq!(partials[0], "s3://corpus/maps/chunk-0.json");

    let aggregate = app
        .client
        .reduce(context::current(), partials)
        .await
        .expect("Failed to reach the service")
        .expect("Reduce failed");
    assert_eq!(aggregate, "s3://corpus/final/result.json");

    let stored = app
        .store
        .object(&aggregate.parse().unwrap())
        .expect("Aggregate missing from the store");
    assert_eq!(stored.content_type, "application/json");

    let counts: BTreeMap<String, u64> =
        serde_json::from_slice(&stored.bytes).expect("Aggregate is not JSON");
    let expected = BTreeMap::from([
        ("cat".to_string(), 1),
        ("dog".to_string(), 1),
        ("ran".to_string(), 1),
        ("sat".to_string(), 1),
        ("the".to_string(), 2),
    ]);
    assert_eq!(counts, expected);
}

#[tokio::test]
async fn split_should_default_to_three_partitions() {
    let app = spawn_service().await;
    let source: ObjectLocation = "s3://corpus/input.txt".parse().unwrap();
    app.store
        .put(&source, b"a\nb\nc\nd\ne\nf\ng", "text/plain")
        .await
        .expect("Failed to seed source");

    let chunks = app
        .client
        .split(context::current(), source.to_string(), None)
        .await
        .expect("Failed to reach the service")
        .expect("Split failed");

    assert_eq!(chunks.len(), 3);
}

#[tokio::test]
async fn the_service_should_shut_down_gracefully() {
    let app = spawn_service().await;
    assert!(app
        .client
        .health(context::current())
        .await
        .expect("Failed to reach the service"));

    app.shutdown_tx.send(()).ok();

    let result = app.handle.await.expect("Failed to join the service task");
    assert_ok!(result);
}
