//! Integration tests for the HTTP client machinery.
//!
//! These tests drive the full execute path against a mock server: response
//! decoding, pagination and rate header parsing, error classification, the
//! pre-emptive rate-limit short circuit, and concurrent snapshot updates.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use forge_api::{
    ApiError, ApiRequest, BaseUrl, Client, ForgeConfig, HttpMethod, ListOptions, RateCategory,
    RateSnapshot,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client pointed at the given mock server.
fn client_for(server: &MockServer) -> Client {
    let config = ForgeConfig::builder()
        .base_url(BaseUrl::new(format!("{}/", server.uri())).unwrap())
        .build()
        .unwrap();
    Client::new(config)
}

fn get(client: &Client, endpoint: &str) -> ApiRequest {
    ApiRequest::builder(HttpMethod::Get, endpoint)
        .build(client.config())
        .unwrap()
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_execute_decodes_json_and_parses_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .and(header("Accept", "application/vnd.forge.v3+json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "full_name": "octo/hello"}))
                .insert_header("X-RateLimit-Limit", "60")
                .insert_header("X-RateLimit-Remaining", "59")
                .insert_header("X-RateLimit-Reset", "1372700873")
                .insert_header(
                    "Link",
                    r#"<https://x/?page=1>; rel="first", <https://x/?page=3>; rel="next""#,
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .execute::<Value>(get(&client, "repos/octo/hello"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body.unwrap()["full_name"], "octo/hello");
    assert_eq!(response.pages.first, 1);
    assert_eq!(response.pages.next, 3);
    assert_eq!(response.pages.prev, 0);
    assert_eq!(response.pages.last, 0);
    assert_eq!(response.rate.limit, 60);
    assert_eq!(response.rate.remaining, 59);

    // The snapshot is recorded on the client's tracker as well.
    let recorded = client.rate_limiter().snapshot(RateCategory::Core);
    assert_eq!(recorded, response.rate);
}

#[tokio::test]
async fn test_empty_success_body_decodes_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/octo/hello/issues/1/lock"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ApiRequest::builder(HttpMethod::Delete, "repos/octo/hello/issues/1/lock")
        .build(client.config())
        .unwrap();
    let response = client.execute::<Value>(request).await.unwrap();

    assert_eq!(response.status, 204);
    assert!(response.body.is_none());
}

#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .execute::<Value>(get(&client, "repos/octo/hello"))
        .await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_execute_raw_returns_body_verbatim() {
    let raw_diff = "diff --git a/README b/README\n+hello\n";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello/pulls/7"))
        .and(header("Accept", "application/vnd.forge.v3.diff"))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw_diff))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ApiRequest::builder(HttpMethod::Get, "repos/octo/hello/pulls/7")
        .accept("application/vnd.forge.v3.diff")
        .build(client.config())
        .unwrap();
    let response = client.execute_raw(request).await.unwrap();

    assert_eq!(response.body, raw_diff.as_bytes());
}

#[tokio::test]
async fn test_post_sends_json_body_and_query_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/hello/issues"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"title": "Found a bug"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello/issues"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let create = ApiRequest::builder(HttpMethod::Post, "repos/octo/hello/issues")
        .json(&json!({"title": "Found a bug"}))
        .unwrap()
        .build(client.config())
        .unwrap();
    let created = client.execute::<Value>(create).await.unwrap();
    assert_eq!(created.status, 201);

    let list = ApiRequest::builder(HttpMethod::Get, "repos/octo/hello/issues")
        .options(&ListOptions {
            page: Some(2),
            per_page: None,
        })
        .build(client.config())
        .unwrap();
    client.execute::<Value>(list).await.unwrap();
}

// ============================================================================
// Error classification
// ============================================================================

#[tokio::test]
async fn test_202_with_empty_body_is_accepted_not_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello/stats/contributors"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .execute::<Value>(get(&client, "repos/octo/hello/stats/contributors"))
        .await;

    match result {
        Err(ApiError::Accepted(accepted)) => assert!(accepted.raw.is_empty()),
        other => panic!("expected Accepted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_403_with_exhausted_quota_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({
                    "message": "API rate limit exceeded for 127.0.0.1.",
                    "documentation_url": "https://docs.forge.dev/rest/overview#rate-limiting"
                }))
                .insert_header("X-RateLimit-Limit", "60")
                .insert_header("X-RateLimit-Remaining", "0")
                .insert_header("X-RateLimit-Reset", "1372700873"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .execute::<Value>(get(&client, "repos/octo/hello"))
        .await;

    match result {
        Err(ApiError::RateLimited(error)) => {
            assert_eq!(error.rate.remaining, 0);
            assert_eq!(error.rate.limit, 60);
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_403_abuse_detection_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({
                    "message": "You have triggered an abuse detection mechanism.",
                    "documentation_url": "https://docs.forge.dev/rest/overview#abuse-rate-limits"
                }))
                .insert_header("Retry-After", "30"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .execute::<Value>(get(&client, "repos/octo/hello"))
        .await;

    match result {
        Err(ApiError::AbuseDetected(error)) => {
            assert_eq!(error.retry_after, Some(Duration::from_secs(30)));
        }
        other => panic!("expected AbuseDetected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_401_with_otp_challenge_is_two_factor_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({
                    "message": "Must specify two-factor authentication OTP code."
                }))
                .insert_header("X-Forge-OTP", "required; sms"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.execute::<Value>(get(&client, "user")).await;

    assert!(matches!(result, Err(ApiError::TwoFactorRequired(_))));
}

#[tokio::test]
async fn test_422_keeps_structured_validation_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/hello/issues"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [
                {"resource": "Issue", "field": "title", "code": "missing_field"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ApiRequest::builder(HttpMethod::Post, "repos/octo/hello/issues")
        .json(&json!({}))
        .unwrap()
        .build(client.config())
        .unwrap();
    let result = client.execute::<Value>(request).await;

    match result {
        Err(ApiError::Response(response)) => {
            assert_eq!(response.status, 422);
            assert_eq!(response.message, "Validation Failed");
            assert_eq!(response.errors.len(), 1);
            assert_eq!(response.errors[0].code, "missing_field");
        }
        other => panic!("expected Response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_responses_still_record_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "Not Found"}))
                .insert_header("X-RateLimit-Limit", "60")
                .insert_header("X-RateLimit-Remaining", "41")
                .insert_header("X-RateLimit-Reset", "1372700873"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.execute::<Value>(get(&client, "missing")).await;
    assert!(matches!(result, Err(ApiError::Response(_))));

    // Rate headers are present on failures too, and must be recorded.
    assert_eq!(client.rate_limiter().snapshot(RateCategory::Core).remaining, 41);
}

// ============================================================================
// Pre-emptive throttling
// ============================================================================

#[tokio::test]
async fn test_exhausted_quota_short_circuits_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.rate_limiter().record(
        RateCategory::Core,
        RateSnapshot {
            limit: 60,
            remaining: 0,
            reset: Utc::now() + chrono::Duration::minutes(10),
        },
    );

    let result = client
        .execute::<Value>(get(&client, "repos/octo/hello"))
        .await;

    match result {
        Err(ApiError::RateLimited(error)) => assert_eq!(error.rate.remaining, 0),
        other => panic!("expected RateLimited, got {other:?}"),
    }
    // MockServer verifies the zero-call expectation on drop.
}

#[tokio::test]
async fn test_search_category_does_not_block_core_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.rate_limiter().record(
        RateCategory::Search,
        RateSnapshot {
            limit: 30,
            remaining: 0,
            reset: Utc::now() + chrono::Duration::minutes(10),
        },
    );

    // The search quota is exhausted; core calls must still go out.
    client
        .execute::<Value>(get(&client, "repos/octo/hello"))
        .await
        .unwrap();
}

// ============================================================================
// Cancellation and transport failures
// ============================================================================

#[tokio::test]
async fn test_cancellation_fires_instead_of_completing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    let request = ApiRequest::builder(HttpMethod::Get, "slow")
        .cancel(token.clone())
        .build(client.config())
        .unwrap();

    let cancel_after = tokio::spawn({
        let token = token.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        }
    });

    let result = client.execute::<Value>(request).await;
    assert!(matches!(result, Err(ApiError::Cancelled)));
    cancel_after.await.unwrap();
}

#[tokio::test]
async fn test_transport_error_redacts_client_secret() {
    use forge_api::auth::UnauthenticatedRateLimitedSigner;

    // Nothing listens on port 9; the connection is refused and the
    // transport error carries the request URL.
    let config = ForgeConfig::builder()
        .base_url(BaseUrl::new("http://127.0.0.1:9/").unwrap())
        .build()
        .unwrap();
    let client = Client::with_signer(
        config,
        Arc::new(UnauthenticatedRateLimitedSigner::new("my-id", "hunter2")),
    );

    let request = ApiRequest::builder(HttpMethod::Get, "repos/octo/hello")
        .build(client.config())
        .unwrap();
    let result = client.execute::<Value>(request).await;

    match result {
        Err(ApiError::Transport(error)) => {
            let rendered = format!("{error:?}");
            assert!(!rendered.contains("hunter2"));
            let url = error.url().expect("transport error keeps its URL");
            assert!(url.query().unwrap().contains("client_secret=REDACTED"));
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_calls_never_tear_the_snapshot() {
    let server = MockServer::start().await;
    // Two responses with fully distinct snapshot tuples; whichever call
    // lands last must leave one complete tuple, never a mix.
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .insert_header("X-RateLimit-Limit", "60")
                .insert_header("X-RateLimit-Remaining", "10")
                .insert_header("X-RateLimit-Reset", "1000000000"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .insert_header("X-RateLimit-Limit", "5000")
                .insert_header("X-RateLimit-Remaining", "4999")
                .insert_header("X-RateLimit-Reset", "2000000000"),
        )
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));
    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .execute::<Value>(get(&client, "repos/octo/hello"))
                .await
        })
    };
    let second = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .execute::<Value>(get(&client, "repos/octo/hello"))
                .await
        })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let snapshot = client.rate_limiter().snapshot(RateCategory::Core);
    let tuple = (snapshot.limit, snapshot.remaining, snapshot.reset.timestamp());
    assert!(
        tuple == (60, 10, 1_000_000_000) || tuple == (5000, 4999, 2_000_000_000),
        "torn snapshot: {tuple:?}"
    );
}
