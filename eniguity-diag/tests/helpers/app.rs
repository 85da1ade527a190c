//! Router harness
//!
//! Builds the router over an in-memory database and a private staging
//! directory, and drives it with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use eniguity_diag::services::UploadStager;
use eniguity_diag::{build_router, AppState};

const BOUNDARY: &str = "eniguity-test-boundary";

pub struct TestApp {
    pub state: AppState,
    pub staging: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let staging = TempDir::new().unwrap();
        let pool = eniguity_diag::db::init_memory_pool().await.unwrap();
        let state = AppState::new(pool, UploadStager::new(staging.path()));
        Self { state, staging }
    }

    pub fn db(&self) -> &SqlitePool {
        &self.state.db
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), 25 * 1024 * 1024)
    }

    /// Files left in the staging directory
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging.path()).unwrap().count()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read_json(response).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn upload(&self, field: &str, filename: Option<&str>, bytes: &[u8]) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(multipart_upload("/api/analyze-audio", field, filename, bytes))
            .await
            .unwrap();
        read_json(response).await
    }
}

/// Single-part multipart/form-data request
pub fn multipart_upload(uri: &str, field: &str, filename: Option<&str>, bytes: &[u8]) -> Request<Body> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("non-JSON body ({}): {}", e, String::from_utf8_lossy(&bytes)));
    (status, json)
}
