//! src/splitter.rs
use crate::error::StageError;
use crate::location::{KeyLayout, ObjectLocation};
use crate::storage::ObjectStore;

/// Partition count used when the caller supplies none (or zero).
pub const DEFAULT_PARTITION_COUNT: usize = 3;

/// Partition a source document into line-contiguous chunks.
///
/// The source is read as newline-delimited text and covered by at most
/// `partitions` chunks of `ceil(lines / partitions)` lines each, in order,
/// every line in exactly one chunk. A small source yields fewer chunks than
/// partitions; that is expected, not an error. An empty source is one empty
/// line, hence exactly one empty chunk.
///
/// Returns the ordered locations of the written chunks. Chunks written before
/// a storage failure are not rolled back, but no list is returned for the
/// caller to act on.
#[tracing::instrument(name = "Split source", skip(store, layout))]
pub async fn split_source(
    store: &dyn ObjectStore,
    layout: &KeyLayout,
    source: &ObjectLocation,
    partitions: Option<usize>,
) -> Result<Vec<ObjectLocation>, StageError> {
    let partitions = partitions
        .filter(|count| *count > 0)
        .unwrap_or(DEFAULT_PARTITION_COUNT);

    let data = store.get(source).await?;
    let text = String::from_utf8_lossy(&data);
    let lines: Vec<&str> = text.split('\n').collect();
    let chunk_size = lines.len().div_ceil(partitions);

    let mut chunks = Vec::new();
    for index in 0..partitions {
        let start = index * chunk_size;
        if start >= lines.len() {
            break;
        }
        let end = usize::min(start + chunk_size, lines.len());

        let chunk = source.with_key(layout.chunk_key(index));
        store
            .put(&chunk, lines[start..end].join("\n").as_bytes(), "text/plain")
            .await?;
        tracing::debug!("Wrote lines {start}..{end} to {chunk}");
        chunks.push(chunk);
    }

    Ok(chunks)
}
