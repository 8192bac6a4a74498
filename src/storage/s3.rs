//! src/storage/s3.rs
use super::{ObjectStore, StoreError};
use crate::configuration::StorageSettings;
use crate::location::ObjectLocation;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, Config};
use secrecy::ExposeSecret;

/// Object store backed by an S3-compatible endpoint (MinIO in development).
///
/// Built once at process start from [`StorageSettings`] and handed to the
/// stage entry points; holds no bucket of its own since every location names
/// its container.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(settings: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            settings.aws_access_key_id.clone(),
            settings.aws_secret_key.expose_secret(),
            None,
            None,
            "wordpipe",
        );

        let config = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(settings.aws_region.clone()))
            .endpoint_url(settings.aws_endpoint_url.clone())
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(config),
        }
    }

    /// Create the container if it does not exist yet. Already-existing
    /// containers are fine; anything else is surfaced.
    #[tracing::instrument(name = "Ensure container", skip(self))]
    pub async fn ensure_container(&self, container: &str) -> Result<(), anyhow::Error> {
        match self.client.create_bucket().bucket(container).send().await {
            Ok(_) => {
                tracing::debug!("Created container: {container}");
                Ok(())
            }
            Err(err) => {
                let already_there = err.as_service_error().is_some_and(|service_error| {
                    service_error.is_bucket_already_exists()
                        || service_error.is_bucket_already_owned_by_you()
                });
                if already_there {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("Failed to create container {container}: {err}"))
                }
            }
        }
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    #[tracing::instrument(name = "Get object", skip(self))]
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, StoreError> {
        let output = self
            .client
            .get_object()
            .bucket(location.container())
            .key(location.key())
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|service_error| service_error.is_no_such_key())
                {
                    StoreError::NotFound(location.clone())
                } else {
                    StoreError::Read {
                        location: location.clone(),
                        source: err.into(),
                    }
                }
            })?;

        let data = output.body.collect().await.map_err(|err| StoreError::Read {
            location: location.clone(),
            source: err.into(),
        })?;
        Ok(data.into_bytes().to_vec())
    }

    #[tracing::instrument(name = "Put object", skip(self, bytes))]
    async fn put(
        &self,
        location: &ObjectLocation,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(location.container())
            .key(location.key())
            .content_type(content_type)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|err| StoreError::Write {
                location: location.clone(),
                source: err.into(),
            })?;
        Ok(())
    }
}
