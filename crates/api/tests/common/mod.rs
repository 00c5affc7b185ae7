#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use treeshop_core::upload::UploadPolicy;

use treeshop_api::config::ServerConfig;
use treeshop_api::router::build_app_router;
use treeshop_api::state::AppState;

const BOUNDARY: &str = "treeshop-test-boundary";

/// Smallest byte sequence the image sniffer recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Router plus the temporary uploads directory it writes to.
///
/// The directory is removed when the `TestApp` is dropped.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

/// Build a test `ServerConfig` writing uploads to `uploads_dir`.
pub fn test_config(uploads_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        uploads_dir: uploads_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = test_config(uploads.path());
    let policy = Arc::new(UploadPolicy::new(uploads.path()));
    let state = AppState::new(pool, policy);

    TestApp {
        router: build_app_router(state, &config),
        uploads,
    }
}

/// One part of a multipart/form-data body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a GET request.
pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Send a multipart/form-data POST request.
pub async fn post_multipart(app: &TestApp, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Tree form fields with no file part.
pub fn tree_form<'a>(name: &'a str, description: &'a str, image_url: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("treename", name),
        Part::Text("description", description),
        Part::Text("imageUrl", image_url),
    ]
}

/// Collect a response body into a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}
