#![cfg(feature = "server")]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use currency_basics::server::{probe_data_files, router, CRYPTO_FILE, FIAT_FILE};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tower::ServiceExt;

const CRYPTO_JSON: &str = r#"{"data":[
    {"id":"BTC","name":"Bitcoin","symbol":"BTC"},
    {"id":"ETH","name":"Ethereum","symbol":"ETH"}
]}"#;

// Fiat list stored as a bare array
const FIAT_JSON: &str = r#"[
    {"id":"USD","name":"US Dollar","symbol":"$","code":"USD"}
]"#;

fn write_data_dir(dir: &Path) {
    fs::write(dir.join(CRYPTO_FILE), CRYPTO_JSON).unwrap();
    fs::write(dir.join(FIAT_FILE), FIAT_JSON).unwrap();
}

async fn get_json(dir: &Path, uri: &str) -> (StatusCode, Value) {
    let response = router(dir.to_path_buf())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_server_info() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(dir.path(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Currency API Server");
    assert_eq!(body["status"], "running");
    assert_eq!(body["version"], currency_basics::VERSION);
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(dir.path(), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running");

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_crypto_list_from_wrapped_file() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let (status, body) = get_json(dir.path(), "/api/currencies/crypto").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Crypto currencies retrieved successfully");
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "Bitcoin");
    assert!(body["data"][0].get("code").is_none());
}

#[tokio::test]
async fn test_fiat_list_from_bare_array() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let (status, body) = get_json(dir.path(), "/api/currencies/fiat").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Fiat currencies retrieved successfully");
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["code"], "USD");
}

#[tokio::test]
async fn test_all_lists() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let (status, body) = get_json(dir.path(), "/api/currencies/all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All currencies retrieved successfully");
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"]["crypto"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["fiat"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_file_is_a_500() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CRYPTO_FILE), CRYPTO_JSON).unwrap();

    let (status, body) = get_json(dir.path(), "/api/currencies/fiat").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to load fiat currencies");
    assert_eq!(body["data"], serde_json::json!([]));
    assert!(body.get("count").is_none());

    let (status, body) = get_json(dir.path(), "/api/currencies/all").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to load currencies");

    // The crypto endpoint still works on its own
    let (status, _) = get_json(dir.path(), "/api/currencies/crypto").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_file_is_a_500() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CRYPTO_FILE), "{ not json").unwrap();

    let (status, body) = get_json(dir.path(), "/api/currencies/crypto").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to load crypto currencies");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(Request::builder().uri("/api/currencies/stocks").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_probe_data_files() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(probe_data_files(dir.path()).await, (false, false));

    write_data_dir(dir.path());
    assert_eq!(probe_data_files(dir.path()).await, (true, true));
}

#[tokio::test]
async fn test_bundled_data_files_parse() {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    assert_eq!(probe_data_files(&data_dir).await, (true, true));
}
