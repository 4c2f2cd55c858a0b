//! Shared helpers for integration tests.
//!
//! Builds PDFs and multipart bodies in memory and drives the router
//! directly, without binding a socket.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use lopdf::{Document, Object, Stream, dictionary};
use std::path::Path;
use tower::ServiceExt;

use pdfmerge::config::{Config, SizeLimits};
use pdfmerge::server::ErrorBody;

pub const BOUNDARY: &str = "----pdfmerge-test-boundary";

/// Build a PDF with `pages` pages, each `width` points wide.
///
/// Page widths let tests tell which upload a merged page came from.
pub fn build_pdf(pages: u32, width: f32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 842.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize test PDF");
    bytes
}

/// Width of every page's MediaBox, in page order.
pub fn page_widths(doc: &Document) -> Vec<f32> {
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                .as_float()
                .unwrap()
        })
        .collect()
}

/// Builder for `multipart/form-data` request bodies.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file part under the `files` field.
    pub fn file(self, filename: &str, content: &[u8]) -> Self {
        self.part("files", Some(filename), content)
    }

    /// Add an arbitrary part.
    pub fn part(mut self, name: &str, filename: Option<&str>, content: &[u8]) -> Self {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match filename {
            Some(filename) => {
                format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n")
            }
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
        };
        self.body.extend_from_slice(disposition.as_bytes());
        self.body
            .extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A `POST /api/merge` request carrying `body`.
pub fn merge_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/merge")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Response parts collected for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as an error body.
    pub fn error(&self) -> ErrorBody {
        serde_json::from_slice(&self.body).expect("Response body is not an error body")
    }

    /// Parse the body as raw JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Send one request through the router.
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("Router failed");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Small limits so size tests do not need large buffers.
pub fn small_limits() -> SizeLimits {
    SizeLimits {
        max_file_size_bytes: 4 * 1024,
        max_request_size_bytes: 8 * 1024,
    }
}

/// Config rooted at `temp_dir` with default limits.
pub fn test_config(temp_dir: &Path) -> Config {
    Config::new(temp_dir)
}

/// Number of entries left in `dir`.
pub fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Failed to read temp dir")
        .count()
}
