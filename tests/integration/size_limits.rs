//! Upload size limit handling.

use axum::http::StatusCode;
use tempfile::tempdir;

use pdfmerge::config::MIB;
use pdfmerge::server::{self, ErrorKind};

use crate::common::{
    MultipartBody, build_pdf, dir_entries, merge_request, send, small_limits, test_config,
};

#[tokio::test]
async fn test_oversized_file_is_rejected_by_name() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()).with_limits(small_limits()));

    let body = MultipartBody::new()
        .file("small.pdf", &build_pdf(1, 595.0))
        .file("big.pdf", &vec![b'x'; 5 * 1024])
        .build();
    let response = send(app, merge_request(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    let error = response.error();
    assert_eq!(error.error, ErrorKind::FileSizeExceeded);
    assert_eq!(error.max_file_size.as_deref(), Some("4KB"));
    assert!(error.message.contains("'big.pdf'"));
    assert!(error.actual_size.is_none());
    assert_eq!(dir_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_oversized_file_wins_over_invalid_content() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()).with_limits(small_limits()));

    let body = MultipartBody::new()
        .file("notes.pdf", b"not a pdf at all")
        .file("huge.pdf", &vec![0u8; 6 * 1024])
        .build();
    let response = send(app, merge_request(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error().error, ErrorKind::FileSizeExceeded);
}

#[tokio::test]
async fn test_unnamed_part_gets_positional_name() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()).with_limits(small_limits()));

    let body = MultipartBody::new()
        .file("a.pdf", &build_pdf(1, 595.0))
        .part("files", None, &vec![0u8; 5 * 1024])
        .build();
    let response = send(app, merge_request(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response.error().message.contains("'file-2'"));
}

#[tokio::test]
async fn test_aggregate_over_limit_reports_actual_size() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()).with_limits(small_limits()));

    let chunk = vec![0u8; 3 * 1024];
    let body = MultipartBody::new()
        .file("a.pdf", &chunk)
        .file("b.pdf", &chunk)
        .file("c.pdf", &chunk)
        .build();
    let response = send(app, merge_request(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    let json = response.json();
    assert_eq!(json["error"], "REQUEST_SIZE_EXCEEDED");
    assert_eq!(json["maxRequestSize"], "8KB");
    assert_eq!(json["actualSize"], "9.0 KB");
    assert!(json.get("maxFileSize").is_none());
    assert_eq!(dir_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_many_small_files_over_aggregate_report_real_total() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()).with_limits(small_limits()));

    // Each part is within the per-file limit; together they are far past
    // the aggregate limit.
    let chunk = vec![0u8; 4 * 1024];
    let mut body = MultipartBody::new();
    for i in 0..300 {
        body = body.file(&format!("part-{i}.pdf"), &chunk);
    }
    let response = send(app, merge_request(body.build())).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    let json = response.json();
    assert_eq!(json["error"], "REQUEST_SIZE_EXCEEDED");
    assert_eq!(json["maxRequestSize"], "8KB");
    assert_eq!(json["actualSize"], "1.2 MB");
    assert_eq!(dir_entries(dir.path()), 0);
}

#[tokio::test]
async fn test_oversized_file_after_aggregate_overflow_is_named() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()).with_limits(small_limits()));

    let chunk = vec![0u8; 4 * 1024];
    let body = MultipartBody::new()
        .file("a.pdf", &chunk)
        .file("b.pdf", &chunk)
        .file("c.pdf", &chunk)
        .file("huge.pdf", &vec![0u8; 64 * 1024])
        .build();
    let response = send(app, merge_request(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    let error = response.error();
    assert_eq!(error.error, ErrorKind::FileSizeExceeded);
    assert!(error.message.contains("'huge.pdf'"));
}

#[tokio::test]
async fn test_body_over_framework_cap_is_upload_size_exceeded() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()).with_limits(small_limits()));

    // Past twice the aggregate limit plus the fixed headroom.
    let body = MultipartBody::new()
        .file("a.pdf", &vec![0u8; (17 * MIB) as usize])
        .build();
    let response = send(app, merge_request(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    let json = response.json();
    assert_eq!(json["error"], "UPLOAD_SIZE_EXCEEDED");
    assert_eq!(json["maxFileSize"], "4KB");
    assert_eq!(json["maxRequestSize"], "8KB");
    assert_eq!(dir_entries(dir.path()), 0);
}

#[tokio::test]
#[ignore = "allocates a 150 MiB upload"]
async fn test_default_limits_reject_150_mib_file() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()));

    let body = MultipartBody::new()
        .file("scan.pdf", &vec![0u8; (150 * MIB) as usize])
        .build();
    let response = send(app, merge_request(body)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    let json = response.json();
    assert_eq!(json["error"], "FILE_SIZE_EXCEEDED");
    assert_eq!(json["maxFileSize"], "100MB");
}
