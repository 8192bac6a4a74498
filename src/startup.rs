//! src/startup.rs
use crate::configuration::Settings;
use crate::location::KeyLayout;
use crate::service::{
    PipelineHandler, PipelineService, PipelineServiceRequest, PipelineServiceResponse,
};
use crate::storage::ObjectStore;
use anyhow::Context;
use futures::prelude::*;
use std::net::SocketAddr;
use std::sync::Arc;
use tarpc::server::{self, Channel};
use tarpc::tokio_serde::formats::Json;
use tarpc::{ClientMessage, Response};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

type PipelineTransport = tarpc::serde_transport::Transport<
    TcpStream,
    ClientMessage<PipelineServiceRequest>,
    Response<PipelineServiceResponse>,
    Json<ClientMessage<PipelineServiceRequest>, Response<PipelineServiceResponse>>,
>;

/// Bound but not yet running pipeline service.
pub struct PipelineServer {
    local_addr: SocketAddr,
    incoming: stream::BoxStream<'static, std::io::Result<PipelineTransport>>,
    handler: PipelineHandler,
}

impl PipelineServer {
    #[tracing::instrument(name = "Build pipeline server", skip_all)]
    pub async fn build(
        configuration: &Settings,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self, anyhow::Error> {
        let address = (
            configuration.application.host.clone(),
            configuration.application.port,
        );
        let mut listener = tarpc::serde_transport::tcp::listen(address, Json::default)
            .await
            .context("Failed to bind the pipeline service listener")?;
        listener.config_mut().max_frame_length(usize::MAX);

        Ok(Self {
            local_addr: listener.local_addr(),
            incoming: listener.boxed(),
            handler: PipelineHandler::new(store, KeyLayout::default()),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        let Self {
            local_addr,
            incoming,
            handler,
        } = self;
        tracing::info!("Serving pipeline stages on {local_addr}");

        incoming
            .filter_map(|accepted| future::ready(accepted.ok()))
            .map(server::BaseChannel::with_defaults)
            .map(move |channel| {
                let handler = handler.clone();
                channel.execute(handler.serve()).for_each(|response| async {
                    tokio::spawn(response);
                })
            })
            .buffer_unordered(16)
            .for_each(|_| async {})
            .await;
        Ok(())
    }

    /// Run on a background task until `shutdown_tx` fires.
    pub fn start(
        self,
        shutdown_tx: &broadcast::Sender<()>,
    ) -> (SocketAddr, JoinHandle<anyhow::Result<()>>) {
        let local_addr = self.local_addr;
        let mut shutdown_rx = shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            tokio::select! {
                result = self.run_until_stopped() => {
                    result
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Pipeline service shutting down");
                    Ok(())
                }
            }
        });
        (local_addr, handle)
    }
}
