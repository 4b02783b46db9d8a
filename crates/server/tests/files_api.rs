use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::fetch::Fetcher;
use serde_json::{json, Value};
use service::editor::EditorService;
use service::storage::{disk::DiskStorage, record_store::RecordStore};
use tempfile::TempDir;
use tower::ServiceExt;

use server::routes;
use server::state::AppState;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

struct TestApp {
    router: Router,
    store: Arc<RecordStore>,
    storage_dir: TempDir,
}

fn build_app() -> anyhow::Result<TestApp> {
    let storage_dir = tempfile::tempdir()?;
    let store = RecordStore::new();
    let editor = EditorService::new(
        Arc::clone(&store),
        DiskStorage::new(storage_dir.path()),
        Fetcher::new(Duration::from_secs(2))?,
    );
    let state = AppState { editor: Arc::new(editor) };
    let router = routes::build_router(state, cors(), storage_dir.path());
    Ok(TestApp { router, store, storage_dir })
}

async fn send(app: &TestApp, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.router.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn json_request(method: &str, uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?)
}

fn empty_request(method: &str, uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method(method).uri(uri).body(Body::empty())?)
}

fn upload_request(filename: &str, content: &str) -> anyhow::Result<Request<Body>> {
    let boundary = "----file-editor-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n--{boundary}--\r\n"
    );
    Ok(Request::builder()
        .method("POST")
        .uri("/files/upload")
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))?)
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let app = build_app()?;
    let (status, body) = send(&app, empty_request("GET", "/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_read_save_lifecycle() -> anyhow::Result<()> {
    let app = build_app()?;

    let (status, body) = send(&app, json_request("POST", "/files/create", json!({"filename": "notes.txt", "content": "hello"}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File created. Call save endpoint to persist.");
    assert!(app.store.get("notes.txt").await.unwrap().dirty);

    let (status, body) = send(&app, empty_request("GET", "/files/notes.txt")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "hello");

    let (status, body) = send(&app, empty_request("POST", "/files/notes.txt/save")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File saved.");
    assert_eq!(std::fs::read_to_string(app.storage_dir.path().join("notes.txt"))?, "hello");

    let (status, body) = send(&app, empty_request("POST", "/files/notes.txt/save")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No changes to save.");
    Ok(())
}

#[tokio::test]
async fn create_without_content_defaults_to_empty() -> anyhow::Result<()> {
    let app = build_app()?;
    let (status, _) = send(&app, json_request("POST", "/files/create", json!({"filename": "blank.txt"}))?).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, empty_request("GET", "/files/blank.txt")?).await?;
    assert_eq!(body["content"], "");
    Ok(())
}

#[tokio::test]
async fn upload_then_update_then_save() -> anyhow::Result<()> {
    let app = build_app()?;

    let (status, body) = send(&app, upload_request("data.json", r#"{"a":0}"#)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "data.json");
    assert!(!app.store.get("data.json").await.unwrap().dirty);

    let (status, body) = send(&app, json_request("PUT", "/files/data.json", json!({"content": "{\"a\":1}"}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Changes staged. Call save endpoint to persist.");
    assert!(app.store.get("data.json").await.unwrap().dirty);

    let (status, _) = send(&app, empty_request("POST", "/files/data.json/save")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.store.get("data.json").await.unwrap().dirty);
    assert_eq!(std::fs::read_to_string(app.storage_dir.path().join("data.json"))?, r#"{"a":1}"#);

    let (status, body) = send(&app, empty_request("GET", "/files")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"filename": "data.json", "kind": "json", "dirty": false}]));
    Ok(())
}

#[tokio::test]
async fn rejected_writes_leave_store_unchanged() -> anyhow::Result<()> {
    let app = build_app()?;

    let (status, body) = send(&app, upload_request("config.yml", "servers: [alpha, beta")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Malformed content");

    let (status, body) = send(&app, upload_request("script.py", "print('hi')")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported file type");

    let (status, _) = send(&app, json_request("POST", "/files/create", json!({"filename": "page.html", "content": ""}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request("POST", "/files/fetch", json!({"url": "http://127.0.0.1:9/raw/tool.exe"}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn unknown_files_are_404() -> anyhow::Result<()> {
    let app = build_app()?;

    let (status, body) = send(&app, empty_request("GET", "/files/missing.txt")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "File not found");

    let (status, _) = send(&app, json_request("PUT", "/files/missing.txt", json!({"content": "x"}))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request("POST", "/files/missing.txt/save")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn upload_requires_file_field() -> anyhow::Result<()> {
    let app = build_app()?;
    let boundary = "b";
    let body = format!("--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{boundary}--\r\n");
    let req = Request::builder()
        .method("POST")
        .uri("/files/upload")
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))?;
    let (status, _) = send(&app, req).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
    Ok(())
}
