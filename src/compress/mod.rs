//! Best-effort size reduction of the merged document.
//!
//! The merged file is reloaded and re-serialized with stream compression.
//! If that fails for any reason the original bytes are returned unchanged;
//! only a failure to read the file at all is an error.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use lopdf::Document;

use crate::error::{MergeError, Result};
use crate::io::PdfWriter;
use crate::utils::format_file_size;

/// Re-serialization step applied to the merged document.
pub trait Resave: Send + Sync {
    /// Load the PDF at `path` and return its re-serialized bytes.
    fn resave(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Re-serializes with `lopdf`, compressing streams and pruning unused objects.
#[derive(Debug, Clone, Default)]
pub struct LopdfResave {
    writer: PdfWriter,
}

impl Resave for LopdfResave {
    fn resave(&self, path: &Path) -> Result<Vec<u8>> {
        let mut doc = Document::load(path)
            .map_err(|e| MergeError::load_pdf(path.display().to_string(), e.to_string()))?;
        self.writer.to_bytes(&mut doc)
    }
}

/// How the returned bytes were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// The re-serialized document.
    Compressed,
    /// The original merged bytes, after re-serialization failed.
    Fallback,
}

/// Bytes ready to send, with how they were produced.
#[derive(Debug, Clone)]
pub struct Compressed {
    /// The document bytes.
    pub bytes: Vec<u8>,
    /// Whether compression succeeded.
    pub outcome: CompressionOutcome,
}

/// Applies [`Resave`] with a silent fallback to the uncompressed file.
#[derive(Clone)]
pub struct Compressor {
    resave: Arc<dyn Resave>,
}

impl Compressor {
    /// Create a compressor backed by `lopdf`.
    pub fn new() -> Self {
        Self::with_resave(LopdfResave::default())
    }

    /// Create a compressor using a custom re-serialization step.
    pub fn with_resave(resave: impl Resave + 'static) -> Self {
        Self {
            resave: Arc::new(resave),
        }
    }

    /// Produce the bytes to send for the merged document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error only if re-serialization failed and the original
    /// file could not be read either.
    pub fn compress(&self, path: &Path) -> Result<Compressed> {
        match self.resave.resave(path) {
            Ok(bytes) => {
                if let Ok(meta) = std::fs::metadata(path) {
                    tracing::debug!(
                        before = %format_file_size(meta.len()),
                        after = %format_file_size(bytes.len() as u64),
                        "Compressed merged document"
                    );
                }
                Ok(Compressed {
                    bytes,
                    outcome: CompressionOutcome::Compressed,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Compression failed, sending uncompressed document");
                let bytes = std::fs::read(path)?;
                Ok(Compressed {
                    bytes,
                    outcome: CompressionOutcome::Fallback,
                })
            }
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compressor").finish_non_exhaustive()
    }
}
