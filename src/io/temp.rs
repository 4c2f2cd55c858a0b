//! Request-scoped temporary files.
//!
//! A [`TempFileStore`] tracks every scratch file created while serving one
//! request and deletes all of them when it is released or dropped, whichever
//! comes first. Each artifact is deleted at most once; deletion failures are
//! logged and never returned to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::{ArtifactKind, TempFileStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = TempFileStore::new(std::env::temp_dir());
//! let input = store.stage(ArtifactKind::Input, &mut &b"%PDF-1.5"[..])?;
//! let output = store.create(ArtifactKind::Output)?;
//! // ... use input.path() and output.path() ...
//! drop(store); // both files are gone
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempPath};

/// Role of a temp file within a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A staged copy of one upload.
    Input,
    /// The merged document.
    Output,
}

impl ArtifactKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Input => "input_",
            Self::Output => "merged_",
        }
    }
}

/// Handle to a tracked temp file.
///
/// The handle only names the file; the owning [`TempFileStore`] decides when
/// it is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempArtifact {
    kind: ArtifactKind,
    path: PathBuf,
}

impl TempArtifact {
    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Role of this artifact.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}

/// Outcome of staging one upload.
#[derive(Debug)]
pub struct Staged {
    /// The tracked artifact holding the copy.
    pub artifact: TempArtifact,
    /// Number of bytes copied from the source.
    pub bytes_written: u64,
}

/// Owner of every temp file created for one request.
#[derive(Debug)]
pub struct TempFileStore {
    dir: PathBuf,
    entries: Vec<(TempArtifact, TempPath)>,
}

impl TempFileStore {
    /// Create an empty store that allocates files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entries: Vec::new(),
        }
    }

    /// Allocate a uniquely named empty file and start tracking it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(&mut self, kind: ArtifactKind) -> io::Result<TempArtifact> {
        let (_file, artifact) = self.allocate(kind)?;
        Ok(artifact)
    }

    /// Allocate a file and copy `source` into it until the source is drained.
    ///
    /// The file is tracked before the copy starts, so a failed copy still
    /// leaves it under this store's cleanup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the copy fails.
    pub fn stage<R: Read + ?Sized>(
        &mut self,
        kind: ArtifactKind,
        source: &mut R,
    ) -> io::Result<Staged> {
        let (file, artifact) = self.allocate(kind)?;

        let mut writer = BufWriter::new(file);
        let bytes_written = io::copy(source, &mut writer)?;
        writer.flush()?;

        Ok(Staged {
            artifact,
            bytes_written,
        })
    }

    fn allocate(&mut self, kind: ArtifactKind) -> io::Result<(File, TempArtifact)> {
        let named = Builder::new()
            .prefix(kind.prefix())
            .suffix(".pdf")
            .tempfile_in(&self.dir)?;
        let (file, temp_path) = named.into_parts();

        let artifact = TempArtifact {
            kind,
            path: temp_path.to_path_buf(),
        };
        self.entries.push((artifact.clone(), temp_path));

        Ok((file, artifact))
    }

    /// Delete one artifact now. Unknown or already released handles are ignored.
    pub fn release(&mut self, artifact: &TempArtifact) {
        if let Some(idx) = self.entries.iter().position(|(a, _)| a == artifact) {
            let (artifact, temp_path) = self.entries.remove(idx);
            Self::delete(artifact, temp_path);
        }
    }

    /// Delete every tracked artifact, output first, then inputs in order.
    pub fn release_all(&mut self) {
        let mut entries = std::mem::take(&mut self.entries);
        entries.sort_by_key(|(a, _)| a.kind != ArtifactKind::Output);
        for (artifact, temp_path) in entries {
            Self::delete(artifact, temp_path);
        }
    }

    fn delete(artifact: TempArtifact, temp_path: TempPath) {
        match temp_path.close() {
            Ok(()) => {
                tracing::trace!(path = %artifact.path.display(), "Removed temp file");
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(
                    path = %artifact.path.display(),
                    error = %err,
                    "Failed to remove temp file"
                );
            }
        }
    }

    /// Number of artifacts still tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for TempFileStore {
    fn drop(&mut self) {
        self.release_all();
    }
}
