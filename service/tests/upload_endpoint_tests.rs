mod common;

use common::*;

use http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

// Happy path tests

#[tokio::test]
async fn issue_upload_url_happy_path() {
    let router = test_router(MockGateway::ok());

    let response = send_post_request(&router, "/v1/uploads/presigned-urls", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "upload authorization issued");
    assert_eq!(body["result"]["operation"], "PUT");

    let url = body["result"]["url"].as_str().unwrap();
    assert!(url.contains("X-Amz-Expires=3600"), "default ttl in url: {url}");

    let bucket = body["result"]["bucket"].as_str().unwrap();
    let key = body["result"]["key"].as_str().unwrap();
    assert!(bucket.starts_with("test-bucket-"));
    assert!(key.starts_with("test-object-"));

    // Expiry accounting is reflected in the response envelope
    let issued_at =
        chrono::DateTime::parse_from_rfc3339(body["result"]["issued_at"].as_str().unwrap())
            .unwrap();
    let expires_at =
        chrono::DateTime::parse_from_rfc3339(body["result"]["expires_at"].as_str().unwrap())
            .unwrap();
    assert_eq!((expires_at - issued_at).num_seconds(), 3600);
}

#[tokio::test]
async fn issue_upload_url_with_explicit_parameters() {
    let router = test_router(MockGateway::ok());

    let payload = json!({
        "operation": "GET",
        "bucket": "my-bucket",
        "key": "my-object",
        "ttl_secs": 60
    });
    let response = send_post_request(&router, "/v1/uploads/presigned-urls", payload).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["result"]["operation"], "GET");
    assert_eq!(body["result"]["bucket"], "my-bucket");
    assert_eq!(body["result"]["key"], "my-object");

    let url = body["result"]["url"].as_str().unwrap();
    assert!(url.contains("X-Amz-Expires=60"));
    assert!(url.contains("X-Amz-SignedOp=GET"));
}

// Validation error tests

#[tokio::test]
async fn issue_upload_url_negative_ttl_is_not_a_success() {
    let router = test_router(MockGateway::ok());

    let response =
        send_post_request(&router, "/v1/uploads/presigned-urls", json!({ "ttl_secs": -1 })).await;

    // Regression guard: issuance failures must never surface as 200
    assert_ne!(response.status(), StatusCode::OK);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_ttl");
    assert_eq!(body["allowRetry"], false);
}

#[tokio::test]
async fn issue_upload_url_over_maximum_ttl() {
    let router = test_router(MockGateway::ok());

    let response = send_post_request(
        &router,
        "/v1/uploads/presigned-urls",
        json!({ "ttl_secs": 604_801 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_ttl");
}

#[tokio::test]
async fn issue_upload_url_rejects_illegal_bucket_name() {
    let router = test_router(MockGateway::ok());

    let response = send_post_request(
        &router,
        "/v1/uploads/presigned-urls",
        json!({ "bucket": "Test-Bucket" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_name");
}

#[tokio::test]
async fn issue_upload_url_rejects_too_short_bucket_before_issuance() {
    let router = test_router(MockGateway::ok());

    let response = send_post_request(
        &router,
        "/v1/uploads/presigned-urls",
        json!({ "bucket": "ab" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_bucket");
}

// Malformed request tests

#[tokio::test]
async fn issue_upload_url_rejects_invalid_json() {
    let router = test_router(MockGateway::ok());

    let response = router
        .clone()
        .oneshot(
            http::Request::builder()
                .method("POST")
                .uri("/v1/uploads/presigned-urls")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_json");
}

// Gateway failure propagation

#[tokio::test]
async fn issue_upload_url_surfaces_gateway_failure() {
    let router = test_router(MockGateway::failing());

    let response = send_post_request(&router, "/v1/uploads/presigned-urls", json!({})).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "upstream_error");
    assert_eq!(body["allowRetry"], true);
}

// Health endpoint

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let router = test_router(MockGateway::ok());

    let response = send_get_request(&router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["semver"].is_string());
}
