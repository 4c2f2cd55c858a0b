//! PDF loading.
//!
//! Wraps `lopdf` loading with error mapping that keeps the upload name in
//! the message, and an optional check that the document has pages.

use lopdf::Document;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::{MergeError, Result};

/// A loaded PDF document with load metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Name used in diagnostics (the upload's filename).
    pub name: String,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,
}

/// PDF reader that only accepts documents with at least one page.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a PDF from disk.
    ///
    /// `name` is used in error messages instead of the on-disk path, which
    /// is a meaningless temp file name to the client.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::LoadPdf`] if the file cannot be read or parsed,
    /// or if the document has no pages.
    pub fn load(&self, path: &Path, name: &str) -> Result<LoadedPdf> {
        let start = Instant::now();

        let document = Document::load(path).map_err(|e| {
            let reason = e.to_string();
            if reason.contains("encrypt") || reason.contains("password") {
                MergeError::load_pdf(name, format!("document is encrypted ({reason})"))
            } else {
                MergeError::load_pdf(name, reason)
            }
        })?;

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(MergeError::load_pdf(name, "PDF has no pages"));
        }

        Ok(LoadedPdf {
            document,
            name: name.to_string(),
            page_count,
            load_time: start.elapsed(),
        })
    }
}
