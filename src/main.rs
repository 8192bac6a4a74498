//! src/main.rs
use anyhow::Context;
use std::sync::Arc;
use wordpipe::configuration::get_configuration;
use wordpipe::startup::PipelineServer;
use wordpipe::storage::S3Storage;
use wordpipe::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _tracer_provider = init_tracing("wordpipe")?;
    let configuration = get_configuration().context("Failed to read configuration")?;

    let store = Arc::new(S3Storage::new(&configuration.storage));
    let server = PipelineServer::build(&configuration, store).await?;
    tracing::info!("Pipeline service listening on {}", server.local_addr());
    server.run_until_stopped().await
}
