//! Signing gateway over the provider's presigning primitive
//!
//! The gateway is stateless: it holds only the pre-configured client handle,
//! supplied once at construction and shared read-only across requests. SigV4
//! canonical-request signing is the provider SDK's responsibility.

mod error;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::{SigningError, SigningResult};

/// Provider maximum for presigned URL expiry (7 days)
pub const MAX_TTL_SECS: u64 = 604_800;

/// Storage operation a signed URL authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Upload an object
    #[default]
    Put,
    /// Download an object
    Get,
    /// Delete an object
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put => write!(f, "PUT"),
            Self::Get => write!(f, "GET"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct SignedUrl {
    /// The presigned URL
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Range-checks a requested TTL before any network call
///
/// # Errors
///
/// Returns `SigningError::InvalidTtl` when `ttl_secs` is not positive or
/// exceeds the provider maximum of 7 days.
pub fn validate_ttl(ttl_secs: i64) -> SigningResult<u64> {
    if ttl_secs <= 0 {
        return Err(SigningError::InvalidTtl(ttl_secs));
    }
    let ttl = ttl_secs.unsigned_abs();
    if ttl > MAX_TTL_SECS {
        return Err(SigningError::InvalidTtl(ttl_secs));
    }
    Ok(ttl)
}

/// Produces time-bounded signed URLs for single storage operations
#[async_trait]
pub trait SigningGateway: Send + Sync {
    /// Signs one `operation` against `bucket`/`key`, valid for `ttl_secs`
    ///
    /// # Errors
    ///
    /// Returns `SigningError::InvalidTtl` for out-of-range TTLs (checked
    /// locally, before the provider is contacted), `SigningError::Config` if
    /// the presigning configuration cannot be built and
    /// `SigningError::Provider` for provider-side failures.
    async fn sign(
        &self,
        operation: Operation,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> SigningResult<SignedUrl>;
}

/// Gateway implementation backed by the S3 SDK's presigning support
pub struct S3SigningGateway {
    client: Arc<S3Client>,
}

impl S3SigningGateway {
    /// Creates a gateway around a pre-configured client handle
    #[must_use]
    pub const fn new(client: Arc<S3Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SigningGateway for S3SigningGateway {
    async fn sign(
        &self,
        operation: Operation,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> SigningResult<SignedUrl> {
        if ttl_secs == 0 || ttl_secs > MAX_TTL_SECS {
            return Err(SigningError::InvalidTtl(i64::try_from(ttl_secs).unwrap_or(i64::MAX)));
        }

        let presigning_config = PresigningConfig::expires_in(Duration::from_secs(ttl_secs))
            .map_err(|e| {
                SigningError::Config(format!("Failed to create presigning config: {e}"))
            })?;

        let presigned = match operation {
            Operation::Put => {
                self.client
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .presigned(presigning_config)
                    .await
                    .map_err(|e| SigningError::Provider(e.to_string()))?
            }
            Operation::Get => {
                self.client
                    .get_object()
                    .bucket(bucket)
                    .key(key)
                    .presigned(presigning_config)
                    .await
                    .map_err(|e| SigningError::Provider(e.to_string()))?
            }
            Operation::Delete => {
                self.client
                    .delete_object()
                    .bucket(bucket)
                    .key(key)
                    .presigned(presigning_config)
                    .await
                    .map_err(|e| SigningError::Provider(e.to_string()))?
            }
        };

        let expires_at: DateTime<Utc> = Utc::now() + Duration::from_secs(ttl_secs);

        debug!(%operation, bucket, key, %expires_at, "signed URL generated");

        Ok(SignedUrl {
            url: presigned.uri().to_string(),
            expires_at,
        })
    }
}
