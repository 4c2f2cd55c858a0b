//! Filesystem and PDF I/O.
//!
//! - [`temp`]: request-scoped scratch files.
//! - [`reader`]: loading PDFs with diagnostics.
//! - [`writer`]: saving PDFs to disk or memory.

pub mod reader;
pub mod temp;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use temp::{ArtifactKind, Staged, TempArtifact, TempFileStore};
pub use writer::{PdfWriter, WriteOptions};
