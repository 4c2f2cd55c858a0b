//! Error-to-response mapping for the HTTP boundary.
//!
//! Every failure a request can hit, whether it comes from the merge pipeline
//! or from multipart decoding, is turned into an [`ApiError`] here and
//! rendered as a flat JSON object of string fields.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::SizeLimits;
use crate::error::MergeError;

/// Machine-readable error kind sent in the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A single file is over the per-file limit.
    FileSizeExceeded,
    /// The files together are over the per-request limit.
    RequestSizeExceeded,
    /// The raw upload was cut off by the body size cap.
    UploadSizeExceeded,
    /// The request carried no files.
    NoFiles,
    /// Anything else.
    ProcessingError,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Error kind.
    pub error: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Per-file limit, on size errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<String>,
    /// Per-request limit, on size errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_request_size: Option<String>,
    /// Observed aggregate size, on aggregate size errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_size: Option<String>,
}

impl ErrorBody {
    fn new(error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            max_file_size: None,
            max_request_size: None,
            actual_size: None,
        }
    }
}

/// An error ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Body for this error.
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// The raw upload went over the body size cap before decoding finished.
    pub fn upload_size_exceeded(limits: &SizeLimits) -> Self {
        let mut body = ErrorBody::new(
            ErrorKind::UploadSizeExceeded,
            "File size exceeds the maximum allowed limit",
        );
        body.max_file_size = Some(limits.max_file_size_label());
        body.max_request_size = Some(limits.max_request_size_label());

        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            body,
        }
    }

    /// Map a multipart decoding failure.
    ///
    /// Hitting the body cap is a size error; anything else is a processing
    /// error.
    pub fn from_multipart(err: MultipartError, limits: &SizeLimits) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::upload_size_exceeded(limits);
        }
        Self::processing(format!("Failed to read upload: {}", err.body_text()))
    }

    /// A generic processing failure.
    pub fn processing(message: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody::new(
                ErrorKind::ProcessingError,
                format!("Error occurred during merging: {message}"),
            ),
        }
    }
}

impl From<MergeError> for ApiError {
    fn from(err: MergeError) -> Self {
        let message = err.to_string();
        match err {
            MergeError::NoFiles => Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody::new(ErrorKind::NoFiles, message),
            },
            MergeError::FileTooLarge { limit, .. } => {
                let mut body = ErrorBody::new(ErrorKind::FileSizeExceeded, message);
                body.max_file_size = Some(limit);
                Self {
                    status: StatusCode::PAYLOAD_TOO_LARGE,
                    body,
                }
            }
            MergeError::RequestTooLarge { limit, actual } => {
                let mut body = ErrorBody::new(ErrorKind::RequestSizeExceeded, message);
                body.max_request_size = Some(limit);
                body.actual_size = Some(actual);
                Self {
                    status: StatusCode::PAYLOAD_TOO_LARGE,
                    body,
                }
            }
            _ => Self::processing(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(kind = ?self.body.error, message = %self.body.message, "Merge request failed");
        } else {
            tracing::warn!(kind = ?self.body.error, message = %self.body.message, "Merge request rejected");
        }

        (self.status, Json(self.body)).into_response()
    }
}
