//! Integration tests for the HTTP API
//!
//! The router is exercised end to end with `oneshot` requests. The
//! ingestion pipeline and broker discovery are stubbed so no ZooKeeper or
//! Kafka is needed; the upload directory is a tempdir per test.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use filefeed_ingest::{BrokerAddress, BrokerDiscovery, FileIngest, IngestOutcome};
use filefeed_server::{app::app, config::Config, features::FeatureState, uploads::UploadStore};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

struct StubIngest {
    outcome: IngestOutcome,
    calls: Mutex<Vec<PathBuf>>,
}

impl StubIngest {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            outcome: IngestOutcome::succeeded("Kafka broker: 127.0.0.1:9092"),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: IngestOutcome::failed(message),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileIngest for StubIngest {
    async fn ingest_file(&self, path: &Path) -> IngestOutcome {
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.outcome.clone()
    }
}

struct StubDiscovery(Option<BrokerAddress>);

#[async_trait]
impl BrokerDiscovery for StubDiscovery {
    async fn resolve_broker(&self) -> Option<BrokerAddress> {
        self.0.clone()
    }
}

fn test_app(dir: &TempDir, ingest: Arc<StubIngest>, broker: Option<BrokerAddress>) -> Router {
    let state = FeatureState {
        uploads: UploadStore::new(
            dir.path(),
            vec!["txt".to_string(), "csv".to_string(), "json".to_string()],
        ),
        ingestor: ingest,
        discovery: Arc::new(StubDiscovery(broker)),
    };
    app(state, &Config::default())
}

fn multipart_upload(filename: &str, contents: &str) -> Request<Body> {
    let boundary = "X-FILEFEED-TEST-BOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\
         \r\n\
         {contents}\r\n\
         --{boundary}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri("/api/v1/files")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_upload_dir() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, StubIngest::succeeding(), None);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn upload_stores_file_and_produces_it() {
    let dir = TempDir::new().unwrap();
    let ingest = StubIngest::succeeding();
    let app = test_app(&dir, ingest.clone(), None);

    let response = app
        .oneshot(multipart_upload("notes.txt", "hello\nworld\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["upload_success"], true);
    assert_eq!(body["data"]["produce_success"], true);
    assert_eq!(body["data"]["message"], "Kafka broker: 127.0.0.1:9092");
    assert_eq!(body["data"]["file_name"], "notes.txt");
    assert_eq!(body["data"]["size"], 12);

    // The file landed in the upload directory with its contents intact and
    // was handed to the pipeline.
    let stored = dir.path().join("notes.txt");
    assert_eq!(std::fs::read_to_string(&stored).unwrap(), "hello\nworld\n");
    assert_eq!(ingest.calls(), vec![stored]);
}

#[tokio::test]
async fn upload_keeps_file_when_producing_fails() {
    let dir = TempDir::new().unwrap();
    let ingest = StubIngest::failing("Failed to get Kafka broker from ZooKeeper!");
    let app = test_app(&dir, ingest, None);

    let response = app
        .oneshot(multipart_upload("notes.txt", "hello\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["upload_success"], true);
    assert_eq!(body["data"]["produce_success"], false);
    assert_eq!(
        body["data"]["message"],
        "Failed to get Kafka broker from ZooKeeper!"
    );
    assert!(dir.path().join("notes.txt").exists());
}

#[tokio::test]
async fn upload_rejects_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let ingest = StubIngest::succeeding();
    let app = test_app(&dir, ingest.clone(), None);

    let response = app
        .oneshot(multipart_upload("binary.exe", "MZ"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Only support extensions: TXT CSV JSON");

    // Nothing stored, nothing produced.
    assert!(!dir.path().join("binary.exe").exists());
    assert!(ingest.calls().is_empty());
}

#[tokio::test]
async fn upload_without_file_field_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, StubIngest::succeeding(), None);

    let boundary = "X-FILEFEED-TEST-BOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\
         \r\n\
         value\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/files")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_collision_gets_incrementing_suffix() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"old").unwrap();
    let app = test_app(&dir, StubIngest::succeeding(), None);

    let response = app
        .oneshot(multipart_upload("notes.txt", "new"))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"]["file_name"], "notes_1.txt");
    assert_eq!(std::fs::read(dir.path().join("notes.txt")).unwrap(), b"old");
    assert_eq!(std::fs::read(dir.path().join("notes_1.txt")).unwrap(), b"new");
}

#[tokio::test]
async fn upload_sanitizes_submitted_name() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, StubIngest::succeeding(), None);

    let response = app
        .oneshot(multipart_upload("my  notes.v2.txt", "x"))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"]["file_name"], "my-notes-v2.txt");
}

#[tokio::test]
async fn list_returns_sorted_files_without_dotfiles() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.txt"), b"x").unwrap();
    std::fs::write(dir.path().join("A.csv"), b"x").unwrap();
    std::fs::write(dir.path().join(".gitignore"), b"x").unwrap();
    let app = test_app(&dir, StubIngest::succeeding(), None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/files")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["files"], serde_json::json!(["A.csv", "b.txt"]));
}

#[tokio::test]
async fn delete_removes_uploaded_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gone.txt"), b"x").unwrap();
    let app = test_app(&dir, StubIngest::succeeding(), None);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/files/gone.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!dir.path().join("gone.txt").exists());

    // Deleting again is a 404.
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/files/gone.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn produce_replays_uploaded_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("words.txt"), b"one\ntwo\n").unwrap();
    let ingest = StubIngest::succeeding();
    let app = test_app(&dir, ingest.clone(), None);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/files/words.txt/produce")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["produce_success"], true);
    assert_eq!(body["data"]["message"], "Kafka broker: 127.0.0.1:9092");
    assert_eq!(ingest.calls(), vec![dir.path().join("words.txt")]);
}

#[tokio::test]
async fn produce_missing_file_is_404_without_ingest() {
    let dir = TempDir::new().unwrap();
    let ingest = StubIngest::succeeding();
    let app = test_app(&dir, ingest.clone(), None);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/files/absent.txt/produce")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(ingest.calls().is_empty());
}

#[tokio::test]
async fn produce_rejects_path_traversal() {
    let dir = TempDir::new().unwrap();
    let ingest = StubIngest::succeeding();
    let app = test_app(&dir, ingest.clone(), None);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/files/..%2Fsecret.txt/produce")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(ingest.calls().is_empty());
}

#[tokio::test]
async fn produce_failure_is_an_outcome_not_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("words.txt"), b"one\n").unwrap();
    let ingest = StubIngest::failing("Kafka broker: 127.0.0.1:9092");
    let app = test_app(&dir, ingest, None);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/files/words.txt/produce")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["produce_success"], false);
}

#[tokio::test]
async fn bootstrap_reports_resolved_broker() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        &dir,
        StubIngest::succeeding(),
        Some(BrokerAddress::new("10.0.0.5", 9092)),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/brokers/bootstrap")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["broker"], "10.0.0.5:9092");
}

#[tokio::test]
async fn bootstrap_without_broker_is_404() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, StubIngest::succeeding(), None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/brokers/bootstrap")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "Failed to get Kafka broker from ZooKeeper!"
    );
}
