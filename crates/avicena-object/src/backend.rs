//! OpenDAL-backed [`ObjectStore`] implementation.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use opendal::Operator;
use opendal::layers::TimeoutLayer;
use tracing::{debug, info};

use crate::TRACING_TARGET;
use crate::config::{StorageConfig, StorageScheme};
use crate::error::{StorageError, StorageResult};
use crate::store::{HeadObject, ObjectStore, PresignedUrl};

/// Storage backend speaking to an object store through OpenDAL.
///
/// Cloning is cheap; all clones share the same underlying operator.
#[derive(Clone)]
pub struct StorageBackend {
    operator: Operator,
    config: StorageConfig,
}

impl StorageBackend {
    /// Creates a backend for the given configuration.
    ///
    /// Validates the configuration and builds the operator without
    /// touching the network; connectivity problems surface on first use.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        config.validate()?;
        let operator = create_operator(&config)?;

        info!(
            target: TRACING_TARGET,
            scheme = %config.scheme,
            bucket = %config.bucket,
            "Storage backend initialized"
        );

        Ok(Self { operator, config })
    }

    /// Returns the configuration this backend was built from.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    #[cfg(test)]
    fn with_operator(operator: Operator, config: StorageConfig) -> Self {
        Self { operator, config }
    }
}

/// Builds the OpenDAL operator for the configured scheme.
///
/// Every operator carries a timeout layer so a stalled store cannot
/// wedge the request path.
fn create_operator(config: &StorageConfig) -> StorageResult<Operator> {
    let timeout = TimeoutLayer::new().with_timeout(config.timeout());

    match config.scheme {
        #[cfg(feature = "s3")]
        StorageScheme::S3 => {
            let mut builder = opendal::services::S3::default().bucket(&config.bucket);
            if let Some(region) = &config.region {
                builder = builder.region(region);
            }
            if let Some(endpoint) = &config.endpoint {
                builder = builder.endpoint(endpoint);
            }
            if let Some(root) = &config.root {
                builder = builder.root(root);
            }
            if let (Some(id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
                builder = builder.access_key_id(id).secret_access_key(secret);
            }

            Operator::new(builder)
                .map(|op| op.layer(timeout).finish())
                .map_err(|err| StorageError::config(err.to_string()))
        }
        #[cfg(feature = "gcs")]
        StorageScheme::Gcs => {
            let mut builder = opendal::services::Gcs::default().bucket(&config.bucket);
            if let Some(endpoint) = &config.endpoint {
                builder = builder.endpoint(endpoint);
            }
            if let Some(root) = &config.root {
                builder = builder.root(root);
            }

            Operator::new(builder)
                .map(|op| op.layer(timeout).finish())
                .map_err(|err| StorageError::config(err.to_string()))
        }
        #[cfg(feature = "azblob")]
        StorageScheme::Azblob => {
            let mut builder = opendal::services::Azblob::default().container(&config.bucket);
            if let Some(endpoint) = &config.endpoint {
                builder = builder.endpoint(endpoint);
            }
            if let Some(root) = &config.root {
                builder = builder.root(root);
            }
            if let (Some(name), Some(key)) = (&config.account_name, &config.account_key) {
                builder = builder.account_name(name).account_key(key);
            }

            Operator::new(builder)
                .map(|op| op.layer(timeout).finish())
                .map_err(|err| StorageError::config(err.to_string()))
        }
        #[cfg(feature = "fs")]
        StorageScheme::Fs => {
            let builder = opendal::services::Fs::default().root(&config.bucket);

            Operator::new(builder)
                .map(|op| op.layer(timeout).finish())
                .map_err(|err| StorageError::config(err.to_string()))
        }
        #[allow(unreachable_patterns)]
        _ => Err(StorageError::config(format!(
            "storage scheme {:?} is not supported with current features",
            config.scheme
        ))),
    }
}

/// Formats the content-disposition header for a presigned download.
fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}

#[async_trait::async_trait]
impl ObjectStore for StorageBackend {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        size: i64,
        content: Bytes,
    ) -> StorageResult<()> {
        debug!(
            target: TRACING_TARGET,
            key = %key,
            size_bytes = size,
            "Writing object"
        );

        self.operator
            .write_with(key, content)
            .content_type(content_type)
            .await?;

        debug!(target: TRACING_TARGET, key = %key, "Object write complete");
        Ok(())
    }

    async fn head(&self, key: &str) -> StorageResult<HeadObject> {
        debug!(target: TRACING_TARGET, key = %key, "Fetching object metadata");

        let metadata = self.operator.stat(key).await?;

        Ok(HeadObject {
            size: i64::try_from(metadata.content_length()).unwrap_or(i64::MAX),
            content_type: metadata.content_type().map(ToOwned::to_owned),
        })
    }

    async fn presign_get(
        &self,
        key: &str,
        download_filename: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl> {
        debug!(
            target: TRACING_TARGET,
            key = %key,
            expires_in_secs = expires_in.as_secs(),
            "Presigning download"
        );

        let disposition = content_disposition(download_filename);
        let request = self
            .operator
            .presign_read_with(key, expires_in)
            .override_content_disposition(&disposition)
            .await?;

        Ok(PresignedUrl {
            url: request.uri().to_string(),
        })
    }
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageBackend")
            .field("scheme", &self.config.scheme)
            .field("bucket", &self.config.bucket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_backend() -> StorageBackend {
        let operator = Operator::new(opendal::services::Memory::default())
            .map(|op| op.finish())
            .unwrap();
        let config = StorageConfig::new(StorageScheme::Fs, "memory");
        StorageBackend::with_operator(operator, config)
    }

    #[tokio::test]
    async fn put_then_head_reports_size() {
        let backend = memory_backend();
        let content = Bytes::from_static(b"%PDF-1.7 minimal");

        backend
            .put(
                "encounters/demo/report.pdf",
                "application/pdf",
                content.len() as i64,
                content.clone(),
            )
            .await
            .unwrap();

        let head = backend.head("encounters/demo/report.pdf").await.unwrap();
        assert_eq!(head.size, content.len() as i64);
    }

    #[tokio::test]
    async fn head_of_missing_object_is_not_found() {
        let backend = memory_backend();

        let err = backend.head("encounters/demo/absent.pdf").await.unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn presign_on_unsupported_backend_is_presign_error() {
        let backend = memory_backend();

        let err = backend
            .presign_get("encounters/demo/report.pdf", "report.pdf", Duration::from_secs(300))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Presign(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn content_disposition_quotes_filename() {
        assert_eq!(
            content_disposition("visit summary.pdf"),
            "attachment; filename=\"visit summary.pdf\""
        );
    }
}
