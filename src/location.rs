//! src/location.rs
use std::fmt;
use std::str::FromStr;

/// Scheme prefix every object location carries on the wire.
pub const LOCATION_SCHEME: &str = "s3://";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("object locations must start with '{LOCATION_SCHEME}'")]
    UnsupportedScheme,
    #[error("object location is missing a container")]
    MissingContainer,
    #[error("object location is missing a key")]
    MissingKey,
    #[error("an object location is required")]
    Missing,
}

/// Address of one object in the shared durable store.
///
/// Stages never exchange payloads directly; every handoff is a location that
/// the next stage resolves against the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    container: String,
    key: String,
}

impl ObjectLocation {
    pub fn new(
        container: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, LocationError> {
        let container = container.into();
        let key = key.into();
        if container.is_empty() {
            return Err(LocationError::MissingContainer);
        }
        if key.is_empty() {
            return Err(LocationError::MissingKey);
        }
        Ok(Self { container, key })
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Derive a sibling location in the same container. Stage outputs always
    /// land next to their inputs.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            container: self.container.clone(),
            key: key.into(),
        }
    }
}

impl FromStr for ObjectLocation {
    type Err = LocationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let rest = raw
            .strip_prefix(LOCATION_SCHEME)
            .ok_or(LocationError::UnsupportedScheme)?;
        let (container, key) = rest.split_once('/').ok_or(LocationError::MissingKey)?;
        Self::new(container, key)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LOCATION_SCHEME}{}/{}", self.container, self.key)
    }
}

/// Naming convention tying the three stages together.
///
/// Stages discover each other's outputs by key transformation rather than a
/// directory service, so the transformation lives in one injectable value
/// instead of inline string handling in stage logic.
#[derive(Clone, Debug)]
pub struct KeyLayout {
    chunk_prefix: String,
    chunk_extension: String,
    partial_prefix: String,
    partial_extension: String,
    final_key: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            chunk_prefix: "chunks/".into(),
            chunk_extension: ".txt".into(),
            partial_prefix: "maps/".into(),
            partial_extension: ".json".into(),
            final_key: "final/result.json".into(),
        }
    }
}

impl KeyLayout {
    /// Key of chunk `index`, e.g. `chunks/chunk-0.txt`.
    pub fn chunk_key(&self, index: usize) -> String {
        format!("{}chunk-{index}{}", self.chunk_prefix, self.chunk_extension)
    }

    /// Key of the partial count derived from a chunk key, e.g.
    /// `chunks/chunk-0.txt` -> `maps/chunk-0.json`. Tolerates keys outside the
    /// chunk namespace by keeping the full basename.
    pub fn partial_key(&self, chunk_key: &str) -> String {
        let base = chunk_key.strip_prefix(&self.chunk_prefix).unwrap_or(chunk_key);
        let base = base.strip_suffix(&self.chunk_extension).unwrap_or(base);
        format!("{}{base}{}", self.partial_prefix, self.partial_extension)
    }

    /// Well-known key of the final aggregate.
    pub fn final_key(&self) -> &str {
        &self.final_key
    }
}
