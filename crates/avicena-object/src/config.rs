//! Storage configuration types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{StorageError, StorageResult};

/// Default timeout for storage round trips, in seconds.
pub const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 30;

/// Minimum accepted storage timeout, in seconds.
pub const MIN_STORAGE_TIMEOUT_SECS: u64 = 1;

/// Maximum accepted storage timeout, in seconds.
pub const MAX_STORAGE_TIMEOUT_SECS: u64 = 300;

/// Storage backend selector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum StorageScheme {
    /// Amazon S3 or any S3-compatible store.
    #[default]
    S3,
    /// Google Cloud Storage.
    Gcs,
    /// Azure Blob Storage.
    Azblob,
    /// Local filesystem (development only, no presigned URLs).
    Fs,
}

impl StorageScheme {
    /// Returns the scheme name as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Gcs => "gcs",
            Self::Azblob => "azblob",
            Self::Fs => "fs",
        }
    }
}

impl fmt::Display for StorageScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageScheme {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "gcs" => Ok(Self::Gcs),
            "azblob" => Ok(Self::Azblob),
            "fs" => Ok(Self::Fs),
            other => Err(StorageError::config(format!(
                "unknown storage scheme '{other}'"
            ))),
        }
    }
}

/// Storage backend configuration.
///
/// Field coverage depends on the scheme: `bucket` doubles as the Azure
/// container name and the filesystem root directory; `region`, `endpoint`
/// and the access key pair apply to S3-compatible stores; the account pair
/// applies to Azure Blob Storage.
#[must_use]
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(clap::Args))]
pub struct StorageConfig {
    /// Which object-store backend to talk to.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "storage-scheme",
            env = "STORAGE_SCHEME",
            value_enum,
            default_value_t = StorageScheme::S3,
        )
    )]
    pub scheme: StorageScheme,

    /// Bucket, container, or filesystem root.
    #[cfg_attr(feature = "config", arg(long = "storage-bucket", env = "STORAGE_BUCKET"))]
    pub bucket: String,

    /// Region for S3-compatible stores.
    #[cfg_attr(feature = "config", arg(long = "storage-region", env = "STORAGE_REGION"))]
    pub region: Option<String>,

    /// Custom endpoint URL (MinIO, R2, and other S3-compatible stores).
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-endpoint", env = "STORAGE_ENDPOINT")
    )]
    pub endpoint: Option<String>,

    /// Key prefix applied inside the bucket.
    #[cfg_attr(feature = "config", arg(long = "storage-root", env = "STORAGE_ROOT"))]
    pub root: Option<String>,

    /// Access key id for S3-compatible stores.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-access-key-id", env = "STORAGE_ACCESS_KEY_ID")
    )]
    pub access_key_id: Option<String>,

    /// Secret access key for S3-compatible stores.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-secret-access-key", env = "STORAGE_SECRET_ACCESS_KEY")
    )]
    pub secret_access_key: Option<String>,

    /// Account name for Azure Blob Storage.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-account-name", env = "STORAGE_ACCOUNT_NAME")
    )]
    pub account_name: Option<String>,

    /// Account key for Azure Blob Storage.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-account-key", env = "STORAGE_ACCOUNT_KEY")
    )]
    pub account_key: Option<String>,

    /// Timeout for storage round trips, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "storage-timeout-secs",
            env = "STORAGE_TIMEOUT_SECS",
            default_value_t = DEFAULT_STORAGE_TIMEOUT_SECS,
        )
    )]
    pub timeout_secs: u64,
}

impl StorageConfig {
    /// Creates a new configuration for the given scheme and bucket.
    pub fn new(scheme: StorageScheme, bucket: impl Into<String>) -> Self {
        Self {
            scheme,
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Sets the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the key prefix inside the bucket.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Sets the S3 access credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Sets the Azure account credentials.
    pub fn with_account(
        mut self,
        account_name: impl Into<String>,
        account_key: impl Into<String>,
    ) -> Self {
        self.account_name = Some(account_name.into());
        self.account_key = Some(account_key.into());
        self
    }

    /// Sets the round-trip timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the round-trip timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the configuration without touching the network.
    pub fn validate(&self) -> StorageResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(StorageError::config("storage bucket must not be empty"));
        }

        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint).map_err(|err| {
                StorageError::config(format!("invalid storage endpoint '{endpoint}': {err}"))
            })?;
        }

        if self.scheme == StorageScheme::Azblob
            && (self.account_name.is_none() || self.account_key.is_none())
        {
            return Err(StorageError::config(
                "azblob requires both an account name and an account key",
            ));
        }

        if !(MIN_STORAGE_TIMEOUT_SECS..=MAX_STORAGE_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(StorageError::config(format!(
                "storage timeout must be between {MIN_STORAGE_TIMEOUT_SECS} and {MAX_STORAGE_TIMEOUT_SECS} seconds, got {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scheme: StorageScheme::default(),
            bucket: String::new(),
            region: None,
            endpoint: None,
            root: None,
            access_key_id: None,
            secret_access_key: None,
            account_name: None,
            account_key: None,
            timeout_secs: DEFAULT_STORAGE_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("scheme", &self.scheme)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("root", &self.root)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_round_trips_through_str() {
        for scheme in [
            StorageScheme::S3,
            StorageScheme::Gcs,
            StorageScheme::Azblob,
            StorageScheme::Fs,
        ] {
            assert_eq!(scheme.as_str().parse::<StorageScheme>().ok(), Some(scheme));
        }

        assert!("carrier-pigeon".parse::<StorageScheme>().is_err());
    }

    #[test]
    fn validates_bucket_presence() {
        let config = StorageConfig::default();
        assert!(config.validate().is_err());

        let config = StorageConfig::new(StorageScheme::S3, "attachments");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validates_endpoint_url() {
        let config =
            StorageConfig::new(StorageScheme::S3, "attachments").with_endpoint("not a url");
        assert!(config.validate().is_err());

        let config = StorageConfig::new(StorageScheme::S3, "attachments")
            .with_endpoint("https://minio.internal:9000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validates_azblob_account_pair() {
        let config = StorageConfig::new(StorageScheme::Azblob, "attachments");
        assert!(config.validate().is_err());

        let config = config.with_account("clinic", "key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validates_timeout_bounds() {
        let config = StorageConfig::new(StorageScheme::S3, "attachments").with_timeout_secs(0);
        assert!(config.validate().is_err());

        let config = config.with_timeout_secs(301);
        assert!(config.validate().is_err());

        let config = config.with_timeout_secs(45);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_masks_secrets() {
        let config = StorageConfig::new(StorageScheme::S3, "attachments")
            .with_credentials("AKIA123", "super-secret")
            .with_account("clinic", "account-secret");
        let rendered = format!("{config:?}");

        assert!(rendered.contains("AKIA123"));
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("account-secret"));
    }
}
