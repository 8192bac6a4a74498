//! src/error.rs
use crate::location::{LocationError, ObjectLocation};
use crate::storage::StoreError;

pub fn error_chain_fmt(
    f: &mut std::fmt::Formatter<'_>,
    e: &impl std::error::Error,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Everything that can terminate a stage invocation.
///
/// No variant is retried internally; each surfaces to the caller as the class
/// of failure it is. Partial success is never reported: a stage that hits any
/// of these has produced nothing.
#[derive(thiserror::Error)]
pub enum StageError {
    #[error("invalid object location")]
    InvalidLocation(#[from] LocationError),
    #[error("failed to read from the object store")]
    StorageRead(#[source] StoreError),
    #[error("failed to write to the object store")]
    StorageWrite(#[source] StoreError),
    #[error("object at {location} is not a token count mapping")]
    MalformedPartial {
        location: ObjectLocation,
        #[source]
        source: serde_json::Error,
    },
}

impl std::fmt::Debug for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}

impl From<StoreError> for StageError {
    fn from(err: StoreError) -> Self {
        match err {
            write @ StoreError::Write { .. } => StageError::StorageWrite(write),
            read => StageError::StorageRead(read),
        }
    }
}
