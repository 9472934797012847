#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use lostpaw::config::ServerConfig;
use lostpaw::context::AppContext;
use lostpaw::db;
use lostpaw::object_store::DiskObjectStore;
use lostpaw::server::build_router;

pub const BOUNDARY: &str = "lostpaw-test-boundary";

/// Smallest byte sequence the image sniffer recognises as JPEG
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

/// A running application over a temp directory and an in-memory database.
///
/// Keep `_dir` alive for the duration of the test; dropping it removes
/// the stored images.
pub struct TestApp {
    pub router: Router,
    pub ctx: AppContext,
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Build the full router after letting the caller tweak the config
pub async fn spawn_app_with(tweak: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let mut config = ServerConfig::for_directory(dir.path());
    tweak(&mut config);

    let objects = Arc::new(DiskObjectStore::new(
        dir.path().join("objects"),
        config.service.public_url.clone(),
    ));
    let pool = db::memory_pool().await.expect("memory pool");
    let ctx = AppContext::from_parts(config, pool, objects);

    TestApp {
        router: build_router(ctx.clone()),
        ctx,
        _dir: dir,
    }
}

/// Multipart body builder for intake requests
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A found-dog submission with every commonly sent field
pub fn dog_form() -> Form {
    Form::new()
        .file("image", "dog.jpg", "image/jpeg", JPEG_BYTES)
        .text("petType", "dog")
        .text("breeds", r#"["beagle"]"#)
        .text("colors", r#"["brown","white"]"#)
        .text("size", "medium")
        .text("location", "Riverside Park")
        .text("coordinates", r#"{"lat":40.8,"lng":-73.97}"#)
        .text("finderName", "Alex")
        .text("finderPhone", "555-0100")
}

pub async fn post_multipart(app: &Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
