use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{
    issuer::{Authorization, IssueRequest},
    signing::Operation,
    state::AppState,
    types::{AppError, ValidatedJson},
};

#[derive(Debug, Deserialize, Validate)]
pub struct IssueUrlRequest {
    /// Operation to authorize; defaults to PUT
    #[serde(default)]
    pub operation: Operation,
    /// Optional bucket hint; synthesized by the naming policy when absent
    #[validate(length(min = 3, max = 63, message = "invalid_bucket"))]
    pub bucket: Option<String>,
    /// Optional object key hint
    #[validate(length(min = 3, max = 63, message = "invalid_key"))]
    pub key: Option<String>,
    /// Validity window in seconds; defaults to the configured TTL
    pub ttl_secs: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SignedUrlResult {
    pub url: String,
    pub operation: Operation,
    pub bucket: String,
    pub key: String,
    pub issued_at: String,  // ISO-8601 UTC
    pub expires_at: String, // ISO-8601 UTC
}

#[derive(Debug, Serialize)]
pub struct IssueUrlResponse {
    pub result: SignedUrlResult,
    pub message: String,
}

impl From<Authorization> for SignedUrlResult {
    fn from(authorization: Authorization) -> Self {
        let expires_at = authorization.expires_at().to_rfc3339();
        Self {
            url: authorization.url,
            operation: authorization.operation,
            bucket: authorization.bucket,
            key: authorization.key,
            issued_at: authorization.issued_at.to_rfc3339(),
            expires_at,
        }
    }
}

/// Issues a presigned upload URL
///
/// Validation failures and gateway failures map to structured non-200
/// responses through `AppError`; an issuance failure is never reported as
/// a success.
#[instrument(skip(state, payload))]
pub async fn issue_upload_url(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<IssueUrlRequest>,
) -> Result<Json<IssueUrlResponse>, AppError> {
    let authorization = state
        .issuer
        .issue(IssueRequest {
            operation: payload.operation,
            bucket: payload.bucket,
            key: payload.key,
            ttl_secs: payload.ttl_secs,
        })
        .await?;

    Ok(Json(IssueUrlResponse {
        result: authorization.into(),
        message: "upload authorization issued".to_string(),
    }))
}
