//! The merge endpoint.
//!
//! A request moves through: decode uploads, validate sizes, stage inputs to
//! temp files, merge, compress, respond. Staging through compression runs on
//! a blocking worker and owns a [`TempFileStore`] that deletes every temp file
//! when the worker returns, on success or failure.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::compress::CompressionOutcome;
use crate::error::{MergeError, Result};
use crate::io::{ArtifactKind, TempFileStore};
use crate::merge::MergeInput;
use crate::server::AppState;
use crate::server::response::ApiError;
use crate::upload::{Upload, UploadSet};
use crate::utils::format_file_size;

/// Multipart field carrying the PDF files.
pub const FILES_FIELD: &str = "files";

/// Filename sent in the `Content-Disposition` header.
pub const MERGED_FILENAME: &str = "merged.pdf";

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: crate::NAME,
        version: crate::VERSION,
    })
}

/// Handler: POST /api/merge
pub async fn merge_pdfs(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Response, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Request is not a multipart upload");
        ApiError::from(MergeError::NoFiles)
    })?;

    let uploads = read_uploads(multipart, &state).await?;

    tracing::info!(
        files = uploads.len(),
        total = %format_file_size(uploads.total_size()),
        "Merge request received"
    );

    if uploads.is_empty() {
        return Err(MergeError::NoFiles.into());
    }
    state.guard.validate(uploads.metas())?;

    let worker_state = Arc::clone(&state);
    let merged = tokio::task::spawn_blocking(move || merge_uploads(&worker_state, &uploads))
        .await
        .map_err(|e| MergeError::Task(e.to_string()))??;

    tracing::info!(bytes = merged.len(), "Sending merged document");

    Ok(pdf_attachment(merged))
}

/// Decode every part of the `files` field, in arrival order.
///
/// Content is buffered only while the file and the running total are within
/// the size limits. After that, parts are drained and counted so validation
/// can report the real sizes.
async fn read_uploads(
    mut multipart: Multipart,
    state: &AppState,
) -> std::result::Result<UploadSet, ApiError> {
    let limits = state.limits;
    let mut uploads = UploadSet::new();
    let mut total: u64 = 0;
    let multipart_err = |e: MultipartError| ApiError::from_multipart(e, &limits);

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("file-{}", uploads.len() + 1));

        let mut content = Vec::new();
        let mut size: u64 = 0;
        let mut keep = true;
        while let Some(chunk) = field.chunk().await.map_err(multipart_err)? {
            let len = chunk.len() as u64;
            size = size.saturating_add(len);
            total = total.saturating_add(len);

            if keep
                && (size > limits.max_file_size_bytes || total > limits.max_request_size_bytes)
            {
                tracing::debug!(name = %filename, "Upload over size limit, counting only");
                keep = false;
                content = Vec::new();
            }
            if keep {
                content.extend_from_slice(&chunk);
            }
        }

        uploads.push(if keep {
            Upload::new(filename, content)
        } else {
            Upload::discarded(filename, size)
        });
    }

    Ok(uploads)
}

/// Stage, merge, and compress already-validated uploads.
///
/// All temp files live in a store local to this call and are gone by the
/// time it returns.
pub fn merge_uploads(state: &AppState, uploads: &UploadSet) -> Result<Vec<u8>> {
    let mut store = TempFileStore::new(&state.temp_dir);

    let mut inputs = Vec::with_capacity(uploads.len());
    for (idx, upload) in uploads.iter().enumerate() {
        let staged = store
            .stage(ArtifactKind::Input, &mut &upload.content[..])
            .map_err(|source| MergeError::Staging {
                filename: upload.filename.clone(),
                source,
            })?;

        if staged.bytes_written != upload.size() {
            return Err(MergeError::Staging {
                filename: upload.filename.clone(),
                source: std::io::Error::other(format!(
                    "wrote {} of {} bytes",
                    staged.bytes_written,
                    upload.size()
                )),
            });
        }

        tracing::debug!(
            index = idx + 1,
            name = %upload.filename,
            bytes = staged.bytes_written,
            path = %staged.artifact.path().display(),
            "Staged input"
        );
        inputs.push(MergeInput::new(&upload.filename, staged.artifact.path()));
    }

    let output = store.create(ArtifactKind::Output)?;
    let stats = state.engine.merge(&inputs, output.path())?;

    tracing::info!(
        files = stats.files_merged,
        pages = stats.total_pages,
        merge_ms = stats.merge_time.as_millis() as u64,
        "Merged documents"
    );

    let compressed = state.compressor.compress(output.path())?;
    if compressed.outcome == CompressionOutcome::Fallback {
        tracing::debug!("Sending merged document without compression");
    }

    store.release_all();
    Ok(compressed.bytes)
}

fn pdf_attachment(bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename={MERGED_FILENAME}");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
