//! `ApiClient` against a throwaway in-process backend.

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use ringlens::fetch::{ApiClient, DataSource, FetchError};
use ringlens::health::{Readiness, SystemStatus};
use ringlens::model::NetworkGroup;
use serde_json::{Value, json};
use std::time::Duration;

const EXPORT_BODY: &str = "{\"rings\": [],\n  \"raw\": true}";

async fn network(Path(id): Path<String>) -> Json<Value> {
    if id != "0xA" {
        return Json(json!({"nodes": [], "links": []}));
    }
    Json(json!({
        "nodes": [
            {"id": "0xA", "group": "suspected"},
            {"id": 42, "group": "related"},
            null
        ],
        "links": [{"source": "0xA", "target": 42}]
    }))
}

async fn analyze(body: Bytes) -> (StatusCode, Json<Value>) {
    let text = String::from_utf8_lossy(&body);
    if !text.contains("name=\"file\"") || !text.contains("sender,receiver,amount") {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "no file"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "batch_id": "b-1",
            "total_transactions": 120,
            "suspicious_nodes": [{"id": "a"}, {"id": "b"}],
            "rings": [{"ring_id": 1}]
        })),
    )
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route(
            "/data",
            get(|| async {
                Json(json!({
                    "clusters": {"mule_accounts": [{"id": "0xM", "txCount": 3}, {"txCount": 9}]},
                    "rings": null
                }))
            }),
        )
        .route(
            "/investigation/suspects",
            get(|| async {
                Json(json!([
                    null,
                    {"id": ""},
                    {"id": "0xA", "score": 91.6, "patterns": ["Circular"]}
                ]))
            }),
        )
        .route("/investigation/network/{id}", get(network))
        .route("/health", get(|| async { Json(json!({"status": "ok", "timestamp": 1})) }))
        .route("/export/json", get(|| async { EXPORT_BODY }))
        .route("/analyze", post(analyze))
        .route("/broken/data", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/garbled/data", get(|| async { "<html>not json</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_analysis_drops_entities_without_id() {
    let base = spawn_backend().await;
    let payload = client(&base).analysis().await.unwrap();
    assert_eq!(payload.clusters.mule_accounts.len(), 1);
    assert_eq!(payload.clusters.mule_accounts[0].id, "0xM");
    assert!(payload.rings.is_empty());
}

#[tokio::test]
async fn test_suspects_skip_null_and_blank_ids() {
    let base = spawn_backend().await;
    let suspects = client(&base).suspects().await.unwrap();
    assert_eq!(suspects.len(), 1);
    assert_eq!(suspects[0].id, "0xA");
}

#[tokio::test]
async fn test_network_normalizes_ids() {
    let base = spawn_backend().await;
    let graph = client(&base).network("0xA").await.unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes[1].id, "42");
    assert_eq!(graph.nodes[1].group, NetworkGroup::Related);
    assert_eq!(graph.links[0].target, "42");

    let empty = client(&base).network("0xZ").await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_minimal_health_reads_online() {
    let base = spawn_backend().await;
    let report = client(&base).health().await.unwrap();
    let status = SystemStatus::from_report(&report);
    assert_eq!(status.readiness, Readiness::Online);
    assert_eq!(status.latency_ms, None);
}

#[tokio::test]
async fn test_export_is_verbatim() {
    let base = spawn_backend().await;
    let bytes = client(&base).export_json().await.unwrap();
    assert_eq!(bytes, EXPORT_BODY.as_bytes());
}

#[tokio::test]
async fn test_analyze_uploads_multipart_file() {
    let base = spawn_backend().await;
    let receipt = client(&base)
        .analyze_csv("tx.csv", b"sender,receiver,amount\na,b,10\n".to_vec())
        .await
        .unwrap();
    assert_eq!(receipt.batch_id.as_deref(), Some("b-1"));
    assert_eq!(receipt.total_transactions, 120);
    assert_eq!(receipt.suspicious_nodes, 2);
    assert_eq!(receipt.rings, 1);
}

#[tokio::test]
async fn test_http_error_status() {
    let base = spawn_backend().await;
    let err = client(&format!("{base}/broken")).analysis().await.unwrap_err();
    match err {
        FetchError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/broken/data"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let base = spawn_backend().await;
    let err = client(&format!("{base}/garbled")).analysis().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = client(&format!("http://{addr}")).health().await.unwrap_err();
    assert!(matches!(err, FetchError::Http { .. }));
}
