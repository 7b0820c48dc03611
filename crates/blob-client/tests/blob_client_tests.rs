// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `BlobClient`
//!
//! These tests use wiremock to stand in for the blob endpoint and a temporary
//! directory for the failure log.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use blob_client::{BlobClient, BlobConfig, BlobError, BlobErrorKind};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const BLOB_PATH: &str = "/listings/properties.json";
const SAS_TOKEN: &str = "?sv=2022-11-02&sr=b&sig=c2lnbmF0dXJl";

/// Create a client pointed at the mock server, logging into `log_dir`
fn create_test_client(base_url: &str, log_dir: &TempDir) -> BlobClient {
    let config = BlobConfig::new(format!("{base_url}{BLOB_PATH}"), SAS_TOKEN)
        .unwrap()
        .with_log_file_path(log_path(log_dir));
    BlobClient::new(config).unwrap()
}

fn log_path(log_dir: &TempDir) -> PathBuf {
    log_dir.path().join("logs").join("blob-error-log.txt")
}

fn read_log_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(ToString::to_string)
        .collect()
}

async fn mount_blob(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(BLOB_PATH))
        .and(query_param("sv", "2022-11-02"))
        .and(query_param("sr", "b"))
        .and(query_param("sig", "c2lnbmF0dXJl"))
        .respond_with(response)
        .expect(1)
        .mount(mock_server)
        .await;
}

/// Test successful retrieval keeps records and their order
#[tokio::test]
async fn fetch_records_success() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    let body = json!([
        {"Name": "Harbor View", "Price": 725000, "City": "Boston"},
        {"Name": "Elm Street Duplex", "Price": 410000, "City": "Portland"},
        {"Name": "Canal Loft", "Price": 1250000, "City": "Chicago"}
    ]);
    mount_blob(&mock_server, ResponseTemplate::new(200).set_body_json(body.clone())).await;

    let records = client.fetch_records().await.unwrap();

    assert_eq!(records.len(), 3);
    let names: Vec<_> = records.iter().filter_map(|r| r.get_str("Name")).collect();
    assert_eq!(names, ["Harbor View", "Elm Street Duplex", "Canal Loft"]);
    assert_eq!(serde_json::to_value(&records).unwrap(), body);
    assert!(!log_path(&log_dir).exists());
}

/// Test a blob slower than the client timeout is a transport failure and is logged
#[tokio::test]
async fn fetch_records_timeout() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let config = BlobConfig::new(format!("{}{BLOB_PATH}", mock_server.uri()), SAS_TOKEN)
        .unwrap()
        .with_timeout(Duration::from_millis(500))
        .with_log_file_path(log_path(&log_dir));
    let client = BlobClient::new(config).unwrap();

    mount_blob(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_string("[]")
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let error = client.fetch_records().await.unwrap_err();

    assert_eq!(error.kind(), BlobErrorKind::Transport);
    assert_eq!(error.status(), None);
    let lines = read_log_lines(&log_path(&log_dir));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" | HTTP error: "));
    assert!(!lines[0].contains("c2lnbmF0dXJl"));
}

/// Test fields are matched regardless of case
#[tokio::test]
async fn fetch_records_case_insensitive_fields() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    mount_blob(
        &mock_server,
        ResponseTemplate::new(200).set_body_string(r#"[{"NAME":"Canal Loft","price":5}]"#),
    )
    .await;

    let records = client.fetch_records().await.unwrap();

    assert_eq!(records[0].get_str("name"), Some("Canal Loft"));
    assert_eq!(records[0].get_f64("Price"), Some(5.0));
}

/// Test an empty array is a valid, empty result
#[tokio::test]
async fn fetch_records_empty_array() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    mount_blob(&mock_server, ResponseTemplate::new(200).set_body_string("[]")).await;

    let records = client.fetch_records().await.unwrap();

    assert!(records.is_empty());
    assert!(!log_path(&log_dir).exists());
}

/// Test the token is appended without touching what is already in the base URL
#[tokio::test]
async fn sas_token_appended_verbatim() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let config = BlobConfig::new(
        format!("{}{BLOB_PATH}?sv=2022-11-02", mock_server.uri()),
        "&sr=b&sig=c2lnbmF0dXJl",
    )
    .unwrap()
    .with_log_file_path(log_path(&log_dir));
    let client = BlobClient::new(config).unwrap();

    mount_blob(&mock_server, ResponseTemplate::new(200).set_body_string("[]")).await;

    assert!(client.fetch_records().await.is_ok());
}

/// Test a missing blob is a transport error with a log line
#[tokio::test]
async fn fetch_records_not_found() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    mount_blob(&mock_server, ResponseTemplate::new(404)).await;

    let error = client.fetch_records().await.unwrap_err();

    match &error {
        BlobError::Transport { status, message } => {
            assert_eq!(*status, Some(404));
            assert!(message.contains("404"));
        }
        other => panic!("Expected Transport error, got: {other:?}"),
    }

    let lines = read_log_lines(&log_path(&log_dir));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" | HTTP error: "));
    assert!(lines[0].ends_with(&error.to_string()));
}

/// Test upstream server errors surface their status
#[tokio::test]
async fn fetch_records_server_error() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    mount_blob(&mock_server, ResponseTemplate::new(503)).await;

    let error = client.fetch_records().await.unwrap_err();

    assert_eq!(error.kind(), BlobErrorKind::Transport);
    assert_eq!(error.status(), Some(503));
}

/// Test the SAS token never reaches the failure log
#[tokio::test]
async fn failure_log_omits_sas_token() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    mount_blob(&mock_server, ResponseTemplate::new(403)).await;

    assert!(client.fetch_records().await.is_err());

    let contents = std::fs::read_to_string(log_path(&log_dir)).unwrap();
    assert!(!contents.contains("c2lnbmF0dXJl"));
}

/// Test malformed JSON is a deserialization error
#[tokio::test]
async fn fetch_records_malformed_json() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    mount_blob(
        &mock_server,
        ResponseTemplate::new(200).set_body_string(r#"[{"Name": "Harbor View""#),
    )
    .await;

    let error = client.fetch_records().await.unwrap_err();

    assert_eq!(error.kind(), BlobErrorKind::Deserialization);
    let lines = read_log_lines(&log_path(&log_dir));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" | JSON error: "));
}

/// Test a JSON `null` body is an error, not an empty list
#[tokio::test]
async fn fetch_records_null_body() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    mount_blob(&mock_server, ResponseTemplate::new(200).set_body_string("null")).await;

    let error = client.fetch_records().await.unwrap_err();

    assert_eq!(error, BlobError::null_payload());
    assert_eq!(read_log_lines(&log_path(&log_dir)).len(), 1);
}

/// Test documents that are not arrays of objects are rejected
#[tokio::test]
async fn fetch_records_wrong_shape() {
    for body in [r#"{"Name":"Harbor View"}"#, r#"["Harbor View"]"#, "42"] {
        let mock_server = MockServer::start().await;
        let log_dir = TempDir::new().unwrap();
        let client = create_test_client(&mock_server.uri(), &log_dir);

        mount_blob(&mock_server, ResponseTemplate::new(200).set_body_string(body)).await;

        let error = client.fetch_records().await.unwrap_err();
        assert_eq!(error.kind(), BlobErrorKind::Deserialization, "body: {body}");
    }
}

/// Test an unreachable endpoint is a transport error without a status
#[tokio::test]
async fn fetch_records_connection_refused() {
    // Reserve a port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&uri, &log_dir);

    let error = client.fetch_records().await.unwrap_err();

    assert_eq!(error.kind(), BlobErrorKind::Transport);
    assert_eq!(error.status(), None);
    assert_eq!(read_log_lines(&log_path(&log_dir)).len(), 1);
}

/// Test a URL that cannot be requested is an unexpected error
#[tokio::test]
async fn fetch_records_unusable_url() {
    let log_dir = TempDir::new().unwrap();
    let config = BlobConfig::new("not a url", "?sig=abc")
        .unwrap()
        .with_log_file_path(log_path(&log_dir));
    let client = BlobClient::new(config).unwrap();

    let error = client.fetch_records().await.unwrap_err();

    assert_eq!(error.kind(), BlobErrorKind::Unexpected);
    let lines = read_log_lines(&log_path(&log_dir));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" | General error: "));
}

/// Test every failed attempt appends its own line
#[tokio::test]
async fn repeated_failures_append_lines() {
    let mock_server = MockServer::start().await;
    let log_dir = TempDir::new().unwrap();
    let client = create_test_client(&mock_server.uri(), &log_dir);

    Mock::given(method("GET"))
        .and(path(BLOB_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    for _ in 0..3 {
        assert!(client.fetch_records().await.is_err());
    }

    assert_eq!(read_log_lines(&log_path(&log_dir)).len(), 3);
}
