//! Error types for the merge pipeline.
//!
//! Every failure the pipeline can produce is a [`MergeError`]. Size-limit
//! violations carry enough context to build the client-facing error body;
//! everything else is reported to the client as a processing error with the
//! underlying message attached.

use std::io;
use std::path::PathBuf;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Main error type for the merge pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The request carried no files.
    #[error("No files were submitted for merging")]
    NoFiles,

    /// A single upload is larger than the per-file limit.
    #[error("File '{filename}' exceeds the maximum allowed size of {limit}")]
    FileTooLarge {
        /// Name of the offending upload.
        filename: String,
        /// Configured per-file limit, human readable.
        limit: String,
    },

    /// The sum of all uploads is larger than the per-request limit.
    #[error("Total request size exceeds the maximum allowed size of {limit}")]
    RequestTooLarge {
        /// Configured per-request limit, human readable.
        limit: String,
        /// Observed aggregate size, human readable.
        actual: String,
    },

    /// An upload could not be copied into its temp file.
    #[error("Failed to stage upload '{filename}': {source}")]
    Staging {
        /// Name of the upload being staged.
        filename: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A staged input is not a loadable PDF.
    #[error("Failed to load PDF '{name}': {reason}")]
    LoadPdf {
        /// Upload name (or path) of the input.
        name: String,
        /// Reason reported by the PDF library.
        reason: String,
    },

    /// The page-tree merge itself failed.
    #[error("{reason}")]
    Merge {
        /// Description of what went wrong.
        reason: String,
    },

    /// The merged document could not be written out.
    #[error("Failed to write PDF to {}: {reason}", .path.display())]
    Write {
        /// Destination being written to.
        path: PathBuf,
        /// Reason reported by the writer.
        reason: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The blocking worker running the pipeline panicked or was cancelled.
    #[error("Merge task failed: {0}")]
    Task(String),
}

impl From<lopdf::Error> for MergeError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge(err.to_string())
    }
}

impl MergeError {
    /// Create a Merge error.
    pub fn merge(reason: impl Into<String>) -> Self {
        Self::Merge {
            reason: reason.into(),
        }
    }

    /// Create a LoadPdf error.
    pub fn load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
