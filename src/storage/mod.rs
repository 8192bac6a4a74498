//! src/storage/mod.rs
use crate::location::ObjectLocation;
use async_trait::async_trait;

mod memory;
mod s3;
pub use memory::{MemoryStore, StoredObject};
pub use s3::S3Storage;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no object at {0}")]
    NotFound(ObjectLocation),
    #[error("failed to read the object at {location}")]
    Read {
        location: ObjectLocation,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write the object at {location}")]
    Write {
        location: ObjectLocation,
        #[source]
        source: anyhow::Error,
    },
}

/// The store seam every stage runs against.
///
/// Stages receive an `Arc<dyn ObjectStore>` instead of constructing a client,
/// so tests substitute [`MemoryStore`] for the live bucket. Implementations
/// must provide read-your-writes for a key written and then read by a later
/// stage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, StoreError>;

    async fn put(
        &self,
        location: &ObjectLocation,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError>;
}
