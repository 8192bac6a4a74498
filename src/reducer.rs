//! src/reducer.rs
use crate::counts::{merge_counts, TokenCounts};
use crate::error::StageError;
use crate::location::{KeyLayout, LocationError, ObjectLocation};
use crate::storage::{ObjectStore, StoreError};

/// Merge any non-empty list of partial counts into the final aggregate.
///
/// The merge is a fold with the count-mapping monoid, so the result does not
/// depend on the order the partials are supplied. All-or-nothing: every
/// partial must fetch and parse before anything is written, and any prior
/// aggregate at the final location is overwritten.
#[tracing::instrument(name = "Reduce partials", skip(store, layout))]
pub async fn reduce_partials(
    store: &dyn ObjectStore,
    layout: &KeyLayout,
    partials: &[ObjectLocation],
) -> Result<ObjectLocation, StageError> {
    let first = partials.first().ok_or(LocationError::Missing)?;

    let mut merged = TokenCounts::new();
    for partial in partials {
        let data = store.get(partial).await?;
        let counts: TokenCounts =
            serde_json::from_slice(&data).map_err(|err| StageError::MalformedPartial {
                location: partial.clone(),
                source: err,
            })?;
        merged = merge_counts([merged, counts]);
    }

    let aggregate = first.with_key(layout.final_key());
    let body = serde_json::to_vec(&merged).map_err(|err| {
        StageError::StorageWrite(StoreError::Write {
            location: aggregate.clone(),
            source: err.into(),
        })
    })?;
    store.put(&aggregate, &body, "application/json").await?;
    tracing::debug!("Wrote aggregate of {} distinct tokens to {aggregate}", merged.len());

    Ok(aggregate)
}
