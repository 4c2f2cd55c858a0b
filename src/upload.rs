//! Uploaded files, in the order the client sent them.

use axum::body::Bytes;

/// One uploaded file.
///
/// Content is only kept while the request is within its size limits. Past
/// that point the upload records how many bytes arrived and nothing else,
/// which is all size validation needs to reject it.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied filename, or a positional fallback.
    pub filename: String,
    /// File content. Empty for discarded uploads.
    pub content: Bytes,
    size: u64,
}

impl Upload {
    /// Create an upload from a name and its content.
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            filename: filename.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Record an upload of `size` bytes whose content was not kept.
    pub fn discarded(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            content: Bytes::new(),
            size,
        }
    }

    /// Size of the upload in bytes, as received.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the content was dropped during decoding.
    pub fn is_discarded(&self) -> bool {
        self.content.len() as u64 != self.size
    }

    /// Metadata view used by size validation.
    pub fn meta(&self) -> FileMeta<'_> {
        FileMeta {
            filename: &self.filename,
            size: self.size(),
        }
    }
}

/// Name and size of an upload, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta<'a> {
    /// Upload name.
    pub filename: &'a str,
    /// Declared size in bytes.
    pub size: u64,
}

/// Ordered uploads for a single request. Order decides merge order.
#[derive(Debug, Clone, Default)]
pub struct UploadSet {
    files: Vec<Upload>,
}

impl UploadSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an upload, keeping arrival order.
    pub fn push(&mut self, upload: Upload) {
        self.files.push(upload);
    }

    /// Number of uploads.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files were uploaded.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all upload sizes.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(Upload::size).sum()
    }

    /// Uploads in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, Upload> {
        self.files.iter()
    }

    /// Metadata for every upload, in arrival order.
    pub fn metas(&self) -> impl Iterator<Item = FileMeta<'_>> {
        self.files.iter().map(Upload::meta)
    }
}

impl FromIterator<Upload> for UploadSet {
    fn from_iter<T: IntoIterator<Item = Upload>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UploadSet {
    type Item = &'a Upload;
    type IntoIter = std::slice::Iter<'a, Upload>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
