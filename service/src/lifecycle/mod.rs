//! Batch lifecycle verification flow
//!
//! Runs create-bucket → issue-authorization → upload-object → delete-object
//! → delete-bucket with per-step failure isolation. The default policy keeps
//! going after a failed step and records the failure, mirroring best-effort
//! cleanup; `AbortOnFirstFailure` gives callers the strict mode instead.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{error::SdkError, Client as S3Client};
use reqwest::header::{HeaderValue, CONTENT_LENGTH};
use thiserror::Error;
use tracing::{info, warn};

use crate::issuer::{Authorization, IssueRequest, Issuer};
use crate::naming::NamingResult;
use crate::signing::Operation;

/// Step name: bucket creation
pub const STEP_CREATE_BUCKET: &str = "create-bucket";
/// Step name: authorization issuance
pub const STEP_ISSUE_AUTHORIZATION: &str = "issue-authorization";
/// Step name: upload through the signed URL
pub const STEP_UPLOAD_OBJECT: &str = "upload-object";
/// Step name: object deletion
pub const STEP_DELETE_OBJECT: &str = "delete-object";
/// Step name: bucket deletion
pub const STEP_DELETE_BUCKET: &str = "delete-bucket";

/// Why a provider operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Bucket name already taken (names are globally unique)
    NameCollision,
    /// Provider-side service failure
    Provider,
    /// HTTP failure while consuming a signed URL
    Http,
}

/// Failure of one bucket/object operation against the provider
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderOperationError {
    /// Failure classification
    pub reason: FailureReason,
    /// Provider or transport message
    pub message: String,
}

impl ProviderOperationError {
    /// Bucket name collision surfaced by the provider
    #[must_use]
    pub fn name_collision(bucket: &str) -> Self {
        Self {
            reason: FailureReason::NameCollision,
            message: format!("bucket name already taken: {bucket}"),
        }
    }

    /// Generic provider-side failure
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Provider,
            message: message.into(),
        }
    }

    /// Transport-level failure consuming a signed URL
    #[must_use]
    pub fn http(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::Http,
            message: message.into(),
        }
    }
}

/// Narrow interface over the provider's bucket/object operations
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates a bucket
    ///
    /// # Errors
    ///
    /// Returns `FailureReason::NameCollision` when the name is already taken,
    /// `FailureReason::Provider` otherwise.
    async fn create_bucket(&self, bucket: &str) -> Result<(), ProviderOperationError>;

    /// Uploads `body` through a presigned PUT URL
    ///
    /// # Errors
    ///
    /// Returns `FailureReason::Http` when the request fails or the provider
    /// rejects the signature (for example after expiry).
    async fn put_via_url(&self, url: &str, body: Vec<u8>) -> Result<(), ProviderOperationError>;

    /// Deletes an object
    ///
    /// # Errors
    ///
    /// Returns `FailureReason::Provider` on provider failure.
    async fn delete_object(&self, bucket: &str, key: &str)
        -> Result<(), ProviderOperationError>;

    /// Deletes a bucket
    ///
    /// # Errors
    ///
    /// Returns `FailureReason::Provider` on provider failure.
    async fn delete_bucket(&self, bucket: &str) -> Result<(), ProviderOperationError>;
}

/// `ObjectStore` backed by the S3 SDK plus an HTTP client for consumption
pub struct S3ObjectStore {
    client: Arc<S3Client>,
    http: reqwest::Client,
}

impl S3ObjectStore {
    /// Creates a store around a pre-configured client handle
    #[must_use]
    pub fn new(client: Arc<S3Client>) -> Self {
        Self {
            client,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ProviderOperationError> {
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(()),
            Err(SdkError::ServiceError(service_err))
                if service_err.err().is_bucket_already_exists()
                    || service_err.err().is_bucket_already_owned_by_you() =>
            {
                Err(ProviderOperationError::name_collision(bucket))
            }
            Err(e) => Err(ProviderOperationError::provider(e.to_string())),
        }
    }

    async fn put_via_url(&self, url: &str, body: Vec<u8>) -> Result<(), ProviderOperationError> {
        let response = self
            .http
            .put(url)
            .header(CONTENT_LENGTH, HeaderValue::from(body.len()))
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderOperationError::http(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderOperationError::http(format!(
                "upload rejected: HTTP {}",
                response.status()
            )))
        }
    }

    async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<(), ProviderOperationError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ProviderOperationError::provider(e.to_string()))
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), ProviderOperationError> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ProviderOperationError::provider(e.to_string()))
    }
}

/// Outcome of one lifecycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed
    Success,
    /// Step failed; the error is recorded on the step
    Failure,
}

/// One executed lifecycle step
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// Step name
    pub name: &'static str,
    /// Success or failure
    pub outcome: StepOutcome,
    /// Error message when the step failed
    pub error: Option<String>,
}

/// One end-to-end lifecycle execution
#[derive(Debug)]
pub struct LifecycleRun {
    /// Bucket exercised by the run
    pub bucket: String,
    /// Object key exercised by the run
    pub key: String,
    /// Executed steps, in order
    pub steps: Vec<StepRecord>,
}

impl LifecycleRun {
    /// Number of failed steps
    #[must_use]
    pub fn failed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Failure)
            .count()
    }

    /// Whether every executed step succeeded
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed_steps() == 0
    }
}

/// What to do when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and keep going (best-effort cleanup)
    #[default]
    ContinueOnFailure,
    /// Stop after the first failed step
    AbortOnFirstFailure,
}

/// Drives one lifecycle run against an object store
pub struct Coordinator<S: ObjectStore> {
    store: S,
    issuer: Arc<Issuer>,
    names: NamingResult,
    policy: FailurePolicy,
    upload_body: Vec<u8>,
}

impl<S: ObjectStore> Coordinator<S> {
    /// Creates a coordinator for one run over `names`
    pub fn new(
        store: S,
        issuer: Arc<Issuer>,
        names: NamingResult,
        policy: FailurePolicy,
        upload_body: Vec<u8>,
    ) -> Self {
        Self {
            store,
            issuer,
            names,
            policy,
            upload_body,
        }
    }

    /// Executes the five lifecycle steps in order
    ///
    /// Under `ContinueOnFailure` every step runs regardless of earlier
    /// failures, so a failed bucket creation produces a run with multiple
    /// failed steps rather than an early abort.
    pub async fn run(&self) -> LifecycleRun {
        let bucket = self.names.bucket.clone();
        let key = self.names.key.clone();
        let mut steps = Vec::with_capacity(5);

        info!(bucket = %bucket, key = %key, "starting lifecycle run");

        record(
            &mut steps,
            STEP_CREATE_BUCKET,
            self.store.create_bucket(&bucket).await,
        );
        if self.aborted(&steps) {
            return LifecycleRun { bucket, key, steps };
        }

        let authorization: Option<Authorization> = record(
            &mut steps,
            STEP_ISSUE_AUTHORIZATION,
            self.issuer
                .issue(IssueRequest {
                    operation: Operation::Put,
                    bucket: Some(bucket.clone()),
                    key: Some(key.clone()),
                    ttl_secs: None,
                })
                .await,
        );
        if self.aborted(&steps) {
            return LifecycleRun { bucket, key, steps };
        }

        let upload_result = match &authorization {
            Some(authorization) => {
                self.store
                    .put_via_url(&authorization.url, self.upload_body.clone())
                    .await
            }
            None => Err(ProviderOperationError::http(
                "no authorization issued; nothing to upload",
            )),
        };
        record(&mut steps, STEP_UPLOAD_OBJECT, upload_result);
        if self.aborted(&steps) {
            return LifecycleRun { bucket, key, steps };
        }

        record(
            &mut steps,
            STEP_DELETE_OBJECT,
            self.store.delete_object(&bucket, &key).await,
        );
        if self.aborted(&steps) {
            return LifecycleRun { bucket, key, steps };
        }

        record(
            &mut steps,
            STEP_DELETE_BUCKET,
            self.store.delete_bucket(&bucket).await,
        );

        LifecycleRun { bucket, key, steps }
    }

    fn aborted(&self, steps: &[StepRecord]) -> bool {
        self.policy == FailurePolicy::AbortOnFirstFailure
            && steps
                .last()
                .is_some_and(|s| s.outcome == StepOutcome::Failure)
    }
}

/// Records one step outcome, returning the step's value on success
fn record<T, E: std::fmt::Display>(
    steps: &mut Vec<StepRecord>,
    name: &'static str,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(value) => {
            info!(step = name, "lifecycle step succeeded");
            steps.push(StepRecord {
                name,
                outcome: StepOutcome::Success,
                error: None,
            });
            Some(value)
        }
        Err(e) => {
            warn!(step = name, error = %e, "lifecycle step failed");
            steps.push(StepRecord {
                name,
                outcome: StepOutcome::Failure,
                error: Some(e.to_string()),
            });
            None
        }
    }
}
