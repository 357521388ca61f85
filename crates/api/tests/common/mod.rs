#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use expense_api::config::ServerConfig;
use expense_api::router::build_app_router;
use expense_api::state::AppState;

pub const ADMIN_TOKEN: &str = "test-admin-token";

const BOUNDARY: &str = "expense-test-boundary";

/// Build a test `ServerConfig` with safe defaults and the given media root.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media_root.to_path_buf(),
        media_url: "/media/".to_string(),
        max_upload_bytes: 1024 * 1024,
        admin_token: Some(ADMIN_TOKEN.to_string()),
    }
}

/// A database pool plus a private media directory that lives as long as
/// the test.
pub struct TestApp {
    pub pool: SqlitePool,
    pub config: ServerConfig,
    media: TempDir,
}

impl TestApp {
    pub fn new(pool: SqlitePool) -> Self {
        let media = tempfile::tempdir().expect("create media tempdir");
        let config = test_config(media.path());
        Self {
            pool,
            config,
            media,
        }
    }

    /// Same as [`TestApp::new`] with the admin console switched off.
    pub fn without_admin(pool: SqlitePool) -> Self {
        let mut app = Self::new(pool);
        app.config.admin_token = None;
        app
    }

    /// Build the full application router, exactly as `main.rs` does.
    pub fn router(&self) -> Router {
        let state = AppState::new(self.pool.clone(), self.config.clone());
        build_app_router(state, &self.config)
    }

    pub fn media_root(&self) -> &Path {
        self.media.path()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, &body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, &body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PATCH, uri, &body)).await
}

/// Send a raw body with an explicit content type.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap();
    send(app, request).await
}

/// Add the admin bearer token to a request.
pub fn with_admin(mut request: Request<Body>) -> Request<Body> {
    request.headers_mut().insert(
        AUTHORIZATION,
        format!("Bearer {ADMIN_TOKEN}").parse().unwrap(),
    );
    request
}

pub async fn admin_get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, with_admin(request)).await
}

/// A file part for [`multipart_body`].
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Encode text fields and an optional file as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(method: Method, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(3, 2))
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub fn coffee() -> serde_json::Value {
    serde_json::json!({
        "expense_name": "Coffee",
        "expense_amount": 5,
        "expense_category": "Food",
        "expense_date": "2024-01-01"
    })
}
