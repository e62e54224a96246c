// Not every helper is used in every test binary
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, response::Response, Router};
use chrono::{DateTime, Utc};
use http::{header::CONTENT_TYPE, Request};
use tower::ServiceExt;

use presign_service::{
    issuer::Issuer,
    lifecycle::{ObjectStore, ProviderOperationError},
    routes,
    signing::{Operation, SignedUrl, SigningError, SigningGateway, SigningResult},
    state::AppState,
};

/// Signing gateway double; produces locally-built URLs or simulated
/// credential failures, no network involved.
pub struct MockGateway {
    pub fail: bool,
}

impl MockGateway {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self { fail: false })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true })
    }
}

#[async_trait]
impl SigningGateway for MockGateway {
    async fn sign(
        &self,
        operation: Operation,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> SigningResult<SignedUrl> {
        if self.fail {
            return Err(SigningError::Provider(
                "simulated credential failure".to_string(),
            ));
        }

        let issued_at = Utc::now();
        Ok(SignedUrl {
            url: format!(
                "https://{bucket}.s3.test/{key}?X-Amz-Expires={ttl_secs}&X-Amz-Date={}\
                 &X-Amz-SignedOp={operation}&X-Amz-Signature=mock",
                issued_at.timestamp()
            ),
            expires_at: issued_at + std::time::Duration::from_secs(ttl_secs),
        })
    }
}

/// Object store double with an injectable clock; consumption honors the
/// expiry encoded in the mock URL and never enforces single use.
pub struct MockStore {
    pub fail_all: bool,
    now: Mutex<DateTime<Utc>>,
    uploads: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn ok() -> Self {
        Self {
            fail_all: false,
            now: Mutex::new(Utc::now()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::ok()
        }
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ProviderOperationError> {
        if self.fail_all {
            return Err(ProviderOperationError::provider(format!(
                "injected create failure for {bucket}"
            )));
        }
        Ok(())
    }

    async fn put_via_url(&self, url: &str, _body: Vec<u8>) -> Result<(), ProviderOperationError> {
        if self.fail_all {
            return Err(ProviderOperationError::http("injected upload failure"));
        }

        let parsed = url::Url::parse(url)
            .map_err(|e| ProviderOperationError::http(format!("bad url: {e}")))?;
        let query = |name: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };

        let expires: i64 = query("X-Amz-Expires")
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ProviderOperationError::http("missing X-Amz-Expires"))?;
        let signed_at: i64 = query("X-Amz-Date")
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ProviderOperationError::http("missing X-Amz-Date"))?;

        let now = self.now.lock().unwrap().timestamp();
        if now > signed_at + expires {
            return Err(ProviderOperationError::http("signature expired"));
        }

        self.uploads.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn delete_object(&self, _bucket: &str, _key: &str) -> Result<(), ProviderOperationError> {
        if self.fail_all {
            return Err(ProviderOperationError::provider("injected delete failure"));
        }
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), ProviderOperationError> {
        if self.fail_all {
            return Err(ProviderOperationError::provider(format!(
                "injected bucket delete failure for {bucket}"
            )));
        }
        Ok(())
    }
}

/// Router wired to a mock gateway; default TTL 3600 as in production
pub fn test_router(gateway: Arc<dyn SigningGateway>) -> Router {
    let issuer = Arc::new(Issuer::new(gateway, "test", 3600));
    routes::handler().with_state(AppState { issuer })
}

pub fn test_issuer(gateway: Arc<dyn SigningGateway>) -> Arc<Issuer> {
    Arc::new(Issuer::new(gateway, "test", 3600))
}

pub async fn send_post_request(
    router: &Router,
    path: &str,
    payload: serde_json::Value,
) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to send request")
}

pub async fn send_get_request(router: &Router, path: &str) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(path)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to send request")
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
