//! tests/api/helpers.rs
use std::sync::{Arc, LazyLock};
use tarpc::client::Config;
use tarpc::tokio_serde::formats::Json;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use wordpipe::configuration::get_configuration;
use wordpipe::service::PipelineServiceClient;
use wordpipe::startup::PipelineServer;
use wordpipe::storage::MemoryStore;
use wordpipe::telemetry::init_tracing;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    init_tracing("tests::api").expect("Failed to setup tracing");
});

pub struct TestApp {
    pub client: PipelineServiceClient,
    pub store: MemoryStore,
    pub shutdown_tx: broadcast::Sender<()>,
    pub handle: JoinHandle<anyhow::Result<()>>,
}

/// Boot a pipeline service on an ephemeral port over an in-memory store and
/// connect a client to it.
pub async fn spawn_service() -> TestApp {
    LazyLock::force(&TRACING);

    let mut configuration = get_configuration().expect("Failed to get configuration");
    configuration.application.port = 0;

    let store = MemoryStore::new();
    let server = PipelineServer::build(&configuration, Arc::new(store.clone()))
        .await
        .expect("Failed to build pipeline server");

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let (socket_addr, handle) = server.start(&shutdown_tx);

    let mut transport = tarpc::serde_transport::tcp::connect(socket_addr, Json::default);
    transport.config_mut().max_frame_length(usize::MAX);
    let client = PipelineServiceClient::new(
        Config::default(),
        transport
            .await
            .expect("Failed to connect to the pipeline service"),
    )
    .spawn();

    TestApp {
        client,
        store,
        shutdown_tx,
        handle,
    }
}
