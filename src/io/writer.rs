//! PDF serialization.
//!
//! Saves a `lopdf` document either to a file or to memory, optionally
//! compressing its streams and renumbering objects first.

use lopdf::Document;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MergeError, Result};

/// Options for writing PDF documents.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Compress content streams before writing.
    pub compress: bool,

    /// Renumber objects into a dense sequence before writing.
    pub optimize: bool,

    /// Buffer size for file writes (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compress: true,
            optimize: true,
            buffer_size: 64 * 1024,
        }
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a writer with default options (compress and optimize).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer that saves the document structure as-is.
    pub fn plain() -> Self {
        Self {
            options: WriteOptions {
                compress: false,
                optimize: false,
                ..Default::default()
            },
        }
    }

    /// Save `doc` to `path`, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Write`] if the file cannot be created or the
    /// document cannot be serialized.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<u64> {
        let write_err = |reason: String| MergeError::Write {
            path: path.to_path_buf(),
            reason,
        };

        self.prepare(doc);

        let file = std::fs::File::create(path).map_err(|e| write_err(e.to_string()))?;
        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| write_err(e.to_string()))?;
        writer.flush().map_err(|e| write_err(e.to_string()))?;

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Ok(file_size)
    }

    /// Serialize `doc` into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self, doc: &mut Document) -> Result<Vec<u8>> {
        self.prepare(doc);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn prepare(&self, doc: &mut Document) {
        if self.options.optimize {
            doc.prune_objects();
            doc.renumber_objects();
        }
        if self.options.compress {
            doc.compress();
        }
    }
}
