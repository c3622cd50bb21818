//! Provider client tests against a local HTTP stub.
//!
//! Each test starts an axum server on an ephemeral port that replays a
//! scripted list of responses and records what the client sent.

mod common;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use vessel_risk_engine::domain::Source;
use vessel_risk_engine::infra::{
    CommodityTrackerSource, MaritimeIntelSource, RetryConfig, RiskError,
};
use vessel_risk_engine::providers::{KplerClient, KplerConfig, LloydsClient, LloydsConfig};

use common::*;

// ============================================================================
// Stub server
// ============================================================================

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    query: String,
    authorization: Option<String>,
    body: Bytes,
}

#[derive(Default)]
struct Script {
    replies: Mutex<VecDeque<(StatusCode, String)>>,
    seen: Mutex<Vec<Seen>>,
}

impl Script {
    fn new(replies: Vec<(StatusCode, String)>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    async fn hits(&self) -> usize {
        self.seen.lock().await.len()
    }
}

async fn replay(
    State(script): State<Arc<Script>>,
    uri: axum::http::Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    script.seen.lock().await.push(Seen {
        path: uri.path().to_string(),
        query: query.unwrap_or_default(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    let (status, body) = script
        .replies
        .lock()
        .await
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "script exhausted".into()));
    (status, body).into_response()
}

/// Serve `script` and return the base URL.
async fn serve(script: Arc<Script>) -> String {
    let app = Router::new()
        .route("/*path", any(replay))
        .with_state(script);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn ok(doc: Value) -> (StatusCode, String) {
    (StatusCode::OK, doc.to_string())
}

fn lloyds(base_url: String) -> LloydsClient {
    LloydsClient::new(LloydsConfig {
        base_url,
        api_token: "lloyds-token".into(),
        timeout: Duration::from_secs(5),
        retry: RetryConfig::fast(),
    })
    .unwrap()
}

fn kpler(base_url: String) -> KplerClient {
    KplerClient::new(KplerConfig {
        base_url,
        api_token: "Basic a3BsZXI=".into(),
        timeout: Duration::from_secs(5),
        retry: RetryConfig::fast(),
    })
    .unwrap()
}

// ============================================================================
// Provider A
// ============================================================================

#[tokio::test]
async fn test_provider_a_sends_imo_and_range() {
    let script = Script::new(vec![ok(quiet_voyages(TEST_IMO))]);
    let client = lloyds(serve(script.clone()).await);

    let doc = client.voyage_events(TEST_IMO, &test_range()).await.unwrap();
    assert_eq!(doc["IsSuccess"], true);

    let seen = script.seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/vesselvoyageevents");
    assert!(seen[0].query.contains(&format!("vesselImo={TEST_IMO}")));
    assert!(seen[0].query.contains("voyageDateRange=2024-01-01-2024-12-31"));
    assert_eq!(seen[0].authorization.as_deref(), Some("lloyds-token"));
}

#[tokio::test]
async fn test_provider_a_retries_unavailable() {
    let script = Script::new(vec![
        (StatusCode::SERVICE_UNAVAILABLE, "busy".into()),
        (StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
        ok(empty_items()),
    ]);
    let client = lloyds(serve(script.clone()).await);

    let doc = client.sanctions(TEST_IMO).await.unwrap();
    assert_eq!(doc, empty_items());
    assert_eq!(script.hits().await, 3);
}

#[tokio::test]
async fn test_provider_a_gives_up_after_retries() {
    let script = Script::new(vec![
        (StatusCode::BAD_GATEWAY, String::new()),
        (StatusCode::BAD_GATEWAY, String::new()),
        (StatusCode::BAD_GATEWAY, String::new()),
        (StatusCode::BAD_GATEWAY, String::new()),
        ok(empty_items()),
    ]);
    let client = lloyds(serve(script.clone()).await);

    let err = client.advanced_compliance(TEST_IMO).await.unwrap_err();
    assert!(matches!(
        err,
        RiskError::ProviderUnavailable {
            provider: Source::ProviderA,
            ..
        }
    ));
    // One attempt plus three retries.
    assert_eq!(script.hits().await, 4);
}

#[tokio::test]
async fn test_provider_a_auth_is_not_retried() {
    let script = Script::new(vec![
        (StatusCode::UNAUTHORIZED, "bad token".into()),
        ok(empty_items()),
    ]);
    let client = lloyds(serve(script.clone()).await);

    let err = client.risk_score(TEST_IMO, &test_range()).await.unwrap_err();
    assert!(matches!(
        err,
        RiskError::ProviderAuth {
            provider: Source::ProviderA,
            status: 401
        }
    ));
    assert_eq!(script.hits().await, 1);
}

#[tokio::test]
async fn test_provider_a_non_json_is_malformed() {
    let script = Script::new(vec![(StatusCode::OK, "<html>maintenance</html>".into())]);
    let client = lloyds(serve(script.clone()).await);

    let err = client.sts_pairings(TEST_IMO, &test_range()).await.unwrap_err();
    assert!(matches!(err, RiskError::MalformedResponse { .. }));
    assert_eq!(script.hits().await, 1);
}

// ============================================================================
// Provider B
// ============================================================================

#[tokio::test]
async fn test_provider_b_posts_imo_batch() {
    let script = Script::new(vec![ok(tracker_doc(TEST_IMO, json!({})))]);
    let client = kpler(serve(script.clone()).await);

    let doc = client
        .vessel_risks(&[TEST_IMO.to_string(), COUNTERPART_IMO.to_string()], &test_range())
        .await
        .unwrap();
    assert!(doc.is_array());

    let seen = script.seen.lock().await;
    assert_eq!(seen[0].path, "/compliance/vessel-risks-v2");
    assert!(seen[0].query.contains("startDate=2024-01-01"));
    assert!(seen[0].query.contains("endDate=2024-12-31"));
    assert_eq!(seen[0].authorization.as_deref(), Some("Basic a3BsZXI="));
    let body: Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(body, json!([9569671, 9000001]));
}

#[tokio::test]
async fn test_provider_b_forbidden_is_auth() {
    let script = Script::new(vec![(StatusCode::FORBIDDEN, String::new())]);
    let client = kpler(serve(script.clone()).await);

    let err = client
        .vessel_risks(&[TEST_IMO.to_string()], &test_range())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RiskError::ProviderAuth {
            provider: Source::ProviderB,
            status: 403
        }
    ));
    assert_eq!(script.hits().await, 1);
}

#[tokio::test]
async fn test_unreachable_provider_is_unavailable() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = KplerClient::new(KplerConfig {
        base_url: format!("http://{addr}"),
        api_token: String::new(),
        timeout: Duration::from_secs(2),
        retry: RetryConfig::none(),
    })
    .unwrap();

    let err = client
        .vessel_risks(&[TEST_IMO.to_string()], &test_range())
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
