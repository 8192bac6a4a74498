//! src/service.rs
use crate::error::StageError;
use crate::location::{KeyLayout, ObjectLocation};
use crate::storage::ObjectStore;
use crate::{mapper, reducer, splitter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tarpc::context;

/// Error class of a failed stage invocation, as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    InvalidLocation,
    StorageRead,
    StorageWrite,
    MalformedPartial,
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FaultKind::InvalidLocation => "invalid location",
            FaultKind::StorageRead => "storage read failure",
            FaultKind::StorageWrite => "storage write failure",
            FaultKind::MalformedPartial => "malformed partial payload",
        };
        f.write_str(name)
    }
}

/// Serializable projection of [`StageError`] for the service boundary.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct StageFault {
    pub kind: FaultKind,
    pub message: String,
}

impl From<StageError> for StageFault {
    fn from(err: StageError) -> Self {
        let kind = match &err {
            StageError::InvalidLocation(_) => FaultKind::InvalidLocation,
            StageError::StorageRead(_) => FaultKind::StorageRead,
            StageError::StorageWrite(_) => FaultKind::StorageWrite,
            StageError::MalformedPartial { .. } => FaultKind::MalformedPartial,
        };
        StageFault {
            kind,
            message: format!("{err:?}"),
        }
    }
}

/// The three pipeline stages plus a liveness probe.
///
/// Every response is the location(s) of what the stage wrote, never the
/// payload; callers fetch payloads from the store themselves.
#[tarpc::service]
pub trait PipelineService {
    /// Liveness probe.
    async fn health() -> bool;

    /// Partition a source document into line-contiguous chunks. `partitions`
    /// defaults to three when absent or zero.
    async fn split(
        source: String,
        partitions: Option<usize>,
    ) -> Result<Vec<String>, StageFault>;

    /// Tokenize one chunk into a partial token count.
    async fn map_chunk(chunk: String) -> Result<String, StageFault>;

    /// Merge a non-empty list of partial counts into the final aggregate.
    async fn reduce(partials: Vec<String>) -> Result<String, StageFault>;
}

/// Request handler behind [`PipelineService`]; owns the store handle and the
/// naming convention, both injected at startup.
#[derive(Clone)]
pub struct PipelineHandler {
    store: Arc<dyn ObjectStore>,
    layout: KeyLayout,
}

impl PipelineHandler {
    pub fn new(store: Arc<dyn ObjectStore>, layout: KeyLayout) -> Self {
        Self { store, layout }
    }
}

impl PipelineService for PipelineHandler {
    async fn health(self, _: context::Context) -> bool {
        true
    }

    #[tracing::instrument(name = "Handle split", skip(self))]
    async fn split(
        self,
        _: context::Context,
        source: String,
        partitions: Option<usize>,
    ) -> Result<Vec<String>, StageFault> {
        let source: ObjectLocation = source.parse().map_err(StageError::from)?;
        let chunks =
            splitter::split_source(self.store.as_ref(), &self.layout, &source, partitions).await?;
        Ok(chunks.iter().map(ObjectLocation::to_string).collect())
    }

    #[tracing::instrument(name = "Handle map", skip(self))]
    async fn map_chunk(self, _: context::Context, chunk: String) -> Result<String, StageFault> {
        let chunk: ObjectLocation = chunk.parse().map_err(StageError::from)?;
        let partial = mapper::map_chunk(self.store.as_ref(), &self.layout, &chunk).await?;
        Ok(partial.to_string())
    }

    #[tracing::instrument(name = "Handle reduce", skip(self))]
    async fn reduce(
        self,
        _: context::Context,
        partials: Vec<String>,
    ) -> Result<String, StageFault> {
        let partials = partials
            .iter()
            .map(|raw| raw.parse::<ObjectLocation>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(StageError::from)?;
        let aggregate =
            reducer::reduce_partials(self.store.as_ref(), &self.layout, &partials).await?;
        Ok(aggregate.to_string())
    }
}
