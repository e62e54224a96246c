//! Authorization issuance
//!
//! Orchestrates the naming policy and signing gateway to produce a presigned
//! upload authorization, and records every issuance in a process-wide,
//! append-only registry used for diagnostics and tests. Single-use is not
//! enforced here: the signature stays replayable until expiry, which is a
//! property of the delegated signing primitive.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::naming::{NamingError, NamingPolicy};
use crate::signing::{self, Operation, SigningError, SigningGateway};

/// Default authorization TTL when a request does not specify one
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Errors that can occur while issuing an authorization
#[derive(Debug, Error)]
pub enum IssueError {
    /// Bucket or key name violates the naming policy
    #[error(transparent)]
    InvalidName(#[from] NamingError),

    /// Requested TTL is outside the accepted range
    #[error("ttl out of range: {0} (must be between 1 and 604800 seconds)")]
    InvalidTtl(i64),

    /// Signing gateway failure
    #[error(transparent)]
    Signing(#[from] SigningError),
}

/// A time-bounded, single-operation upload authorization
///
/// Immutable once created; validity ends at `issued_at + ttl_secs` and is not
/// revocable before that.
#[derive(Debug, Clone, Serialize)]
pub struct Authorization {
    /// Operation the URL authorizes
    pub operation: Operation,
    /// Target bucket
    pub bucket: String,
    /// Target object key
    pub key: String,
    /// Issuance instant
    pub issued_at: DateTime<Utc>,
    /// Validity window in seconds, always positive
    pub ttl_secs: u64,
    /// The presigned URL
    pub url: String,
}

impl Authorization {
    /// Instant at which the URL stops being usable
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::from_secs(self.ttl_secs)
    }

    /// Whether the URL is still usable at `at`
    ///
    /// Valid up to and including the expiry instant, unusable strictly after.
    #[must_use]
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        at <= self.expires_at()
    }
}

/// Issuance request
///
/// `bucket` and `key` are hints; when absent the naming policy synthesizes
/// them. `ttl_secs` falls back to the issuer's configured default.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    /// Operation to authorize
    pub operation: Operation,
    /// Optional bucket hint
    pub bucket: Option<String>,
    /// Optional object key hint
    pub key: Option<String>,
    /// Optional TTL override in seconds
    pub ttl_secs: Option<i64>,
}

/// Issues authorizations and tracks them for the process lifetime
pub struct Issuer {
    gateway: Arc<dyn SigningGateway>,
    naming_prefix: String,
    default_ttl_secs: u64,
    registry: Mutex<Vec<Authorization>>,
}

impl Issuer {
    /// Creates an issuer
    ///
    /// # Arguments
    ///
    /// * `gateway` - Signing gateway, shared read-only across requests
    /// * `naming_prefix` - Prefix for synthesized bucket/key names
    /// * `default_ttl_secs` - TTL applied when a request carries none
    pub fn new(
        gateway: Arc<dyn SigningGateway>,
        naming_prefix: impl Into<String>,
        default_ttl_secs: u64,
    ) -> Self {
        Self {
            gateway,
            naming_prefix: naming_prefix.into(),
            default_ttl_secs,
            registry: Mutex::new(Vec::new()),
        }
    }

    /// Issues one authorization
    ///
    /// Validates TTL and names locally before the gateway is called; gateway
    /// failures are propagated, never swallowed.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::InvalidTtl` or `IssueError::InvalidName` for
    /// inputs rejected before any network call, and `IssueError::Signing`
    /// when the gateway fails.
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned.
    pub async fn issue(&self, request: IssueRequest) -> Result<Authorization, IssueError> {
        let requested_ttl = request
            .ttl_secs
            .unwrap_or_else(|| i64::try_from(self.default_ttl_secs).unwrap_or(i64::MAX));
        let ttl_secs = match signing::validate_ttl(requested_ttl) {
            Ok(ttl) => ttl,
            Err(SigningError::InvalidTtl(v)) => return Err(IssueError::InvalidTtl(v)),
            Err(e) => return Err(e.into()),
        };

        let (bucket, key) = match (request.bucket, request.key) {
            (Some(bucket), Some(key)) => {
                NamingPolicy::ensure_valid(&bucket)?;
                NamingPolicy::ensure_valid(&key)?;
                (bucket, key)
            }
            (Some(bucket), None) => {
                NamingPolicy::ensure_valid(&bucket)?;
                let names = NamingPolicy::generate(&self.naming_prefix)?;
                (bucket, names.key)
            }
            (None, Some(key)) => {
                NamingPolicy::ensure_valid(&key)?;
                let names = NamingPolicy::generate(&self.naming_prefix)?;
                (names.bucket, key)
            }
            (None, None) => {
                let names = NamingPolicy::generate(&self.naming_prefix)?;
                (names.bucket, names.key)
            }
        };

        let signed = self
            .gateway
            .sign(request.operation, &bucket, &key, ttl_secs)
            .await?;

        let authorization = Authorization {
            operation: request.operation,
            bucket,
            key,
            issued_at: Utc::now(),
            ttl_secs,
            url: signed.url,
        };

        info!(
            operation = %authorization.operation,
            bucket = %authorization.bucket,
            key = %authorization.key,
            ttl_secs,
            "issued upload authorization"
        );

        self.registry
            .lock()
            .expect("authorization registry poisoned")
            .push(authorization.clone());

        Ok(authorization)
    }

    /// Number of authorizations issued by this process
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned.
    #[must_use]
    pub fn issued_count(&self) -> usize {
        self.registry
            .lock()
            .expect("authorization registry poisoned")
            .len()
    }

    /// Snapshot of all issued authorizations, in issuance order
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Authorization> {
        self.registry
            .lock()
            .expect("authorization registry poisoned")
            .clone()
    }
}
