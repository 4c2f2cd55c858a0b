//! Core PDF merging implementation.
//!
//! Inputs are merged in the order given. The first document becomes the
//! base; every following document's page tree is attached as a child of the
//! base's root `Pages` node, so inherited page attributes keep applying to
//! the pages they came with.

use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{MergeError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter};

/// One staged input to merge.
#[derive(Debug, Clone)]
pub struct MergeInput {
    /// Name used in diagnostics.
    pub name: String,
    /// Location of the staged PDF.
    pub path: PathBuf,
}

impl MergeInput {
    /// Create a merge input.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Time taken to load all inputs.
    pub load_time: Duration,

    /// Total time taken for the merge, including the write.
    pub merge_time: Duration,

    /// Size of the written output in bytes.
    pub output_size: u64,
}

/// Merges staged PDF files into one document on disk.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    reader: PdfReader,
    writer: PdfWriter,
}

impl MergeEngine {
    /// Create an engine that rejects page-less inputs and writes output
    /// without re-compressing it.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::plain(),
        }
    }

    /// Merge `inputs`, in order, into a new document written to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no inputs, if any input is not a valid
    /// PDF, if a page tree is malformed, or if the output cannot be written.
    pub fn merge(&self, inputs: &[MergeInput], output: &Path) -> Result<MergeStatistics> {
        let merge_start = Instant::now();

        if inputs.is_empty() {
            return Err(MergeError::NoFiles);
        }

        let load_start = Instant::now();
        let loaded = inputs
            .iter()
            .map(|input| self.reader.load(&input.path, &input.name))
            .collect::<Result<Vec<_>>>()?;
        let load_time = load_start.elapsed();

        for pdf in &loaded {
            tracing::debug!(
                name = %pdf.name,
                pages = pdf.page_count,
                load_ms = pdf.load_time.as_millis() as u64,
                "Loaded input"
            );
        }

        let files_merged = loaded.len();
        let mut merged = Self::merge_documents(loaded)?;
        let total_pages = merged.get_pages().len();

        let output_size = self.writer.save(&mut merged, output)?;

        Ok(MergeStatistics {
            files_merged,
            total_pages,
            load_time,
            merge_time: merge_start.elapsed(),
            output_size,
        })
    }

    /// Combine loaded documents into the first one.
    fn merge_documents(loaded: Vec<LoadedPdf>) -> Result<Document> {
        let mut documents = loaded.into_iter();
        let base = documents.next().ok_or(MergeError::NoFiles)?;

        let mut merged = base.document;
        let root_pages = pages_root(&merged)
            .map_err(|e| MergeError::load_pdf(&base.name, format!("missing page tree: {e}")))?;
        let mut max_id = merged.max_id;

        for pdf in documents {
            let mut doc = pdf.document;

            // Avoid object id collisions by renumbering the incoming document
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let subtree = pages_root(&doc)
                .map_err(|e| MergeError::load_pdf(&pdf.name, format!("missing page tree: {e}")))?;

            merged.objects.extend(doc.objects);
            Self::attach_subtree(&mut merged, root_pages, subtree, pdf.page_count)?;
        }

        merged.max_id = max_id;
        Ok(merged)
    }

    /// Hang `subtree` under `root_pages` and patch the page count.
    fn attach_subtree(
        merged: &mut Document,
        root_pages: ObjectId,
        subtree: ObjectId,
        page_count: usize,
    ) -> Result<()> {
        merged
            .get_object_mut(subtree)?
            .as_dict_mut()?
            .set("Parent", Object::Reference(root_pages));

        let pages_dict = merged.get_object_mut(root_pages)?.as_dict_mut()?;

        pages_dict
            .get_mut(b"Kids")?
            .as_array_mut()?
            .push(Object::Reference(subtree));

        let current_count = pages_dict.get(b"Count")?.as_i64()?;
        pages_dict.set("Count", Object::Integer(current_count + page_count as i64));

        Ok(())
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn pages_root(doc: &Document) -> lopdf::Result<ObjectId> {
    doc.catalog()?.get(b"Pages")?.as_reference()
}
