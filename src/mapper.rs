//! src/mapper.rs
use crate::counts::count_tokens;
use crate::error::StageError;
use crate::location::{KeyLayout, ObjectLocation};
use crate::storage::{ObjectStore, StoreError};

/// Tokenize one chunk into a partial token count.
///
/// The output key is derived from the chunk key by the layout, so any
/// component can compute it without asking the store. The serialized mapping
/// carries its keys in sorted order; the bytes for a given chunk are always
/// identical.
#[tracing::instrument(name = "Map chunk", skip(store, layout))]
pub async fn map_chunk(
    store: &dyn ObjectStore,
    layout: &KeyLayout,
    chunk: &ObjectLocation,
) -> Result<ObjectLocation, StageError> {
    let data = store.get(chunk).await?;
    let counts = count_tokens(&String::from_utf8_lossy(&data));

    let partial = chunk.with_key(layout.partial_key(chunk.key()));
    let body = serde_json::to_vec(&counts).map_err(|err| {
        StageError::StorageWrite(StoreError::Write {
            location: partial.clone(),
            source: err.into(),
        })
    })?;
    store.put(&partial, &body, "application/json").await?;
    tracing::debug!("Wrote {} distinct tokens to {partial}", counts.len());

    Ok(partial)
}
