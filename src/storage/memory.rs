//! src/storage/memory.rs
use super::{ObjectStore, StoreError};
use crate::location::ObjectLocation;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process object store with read-your-writes by construction.
///
/// Stands in for the live bucket in tests and local runs; clones share the
/// same objects.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, location: &ObjectLocation) -> Option<StoredObject> {
        self.objects
            .lock()
            .expect("object store lock poisoned")
            .get(&location.to_string())
            .cloned()
    }

    pub fn contains(&self, location: &ObjectLocation) -> bool {
        self.object(location).is_some()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, StoreError> {
        self.object(location)
            .map(|object| object.bytes)
            .ok_or_else(|| StoreError::NotFound(location.clone()))
    }

    async fn put(
        &self,
        location: &ObjectLocation,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.objects
            .lock()
            .expect("object store lock poisoned")
            .insert(
                location.to_string(),
                StoredObject {
                    bytes: bytes.to_vec(),
                    content_type: content_type.to_string(),
                },
            );
        Ok(())
    }
}
