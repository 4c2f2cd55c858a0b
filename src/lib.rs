//! pdfmerge - merge uploaded PDF files over HTTP.
//!
//! The service accepts a multipart upload of PDF files on `POST /api/merge`,
//! concatenates their pages in upload order, applies a best-effort
//! compression pass, and returns the result as `merged.pdf`.
//!
//! The pipeline for one request:
//!
//! 1. [`validation::SizeGuard`] checks per-file and aggregate sizes.
//! 2. [`io::TempFileStore`] stages each upload to a temp file.
//! 3. [`merge::MergeEngine`] merges the staged files into a temp output.
//! 4. [`compress::Compressor`] re-serializes the output, falling back to the
//!    raw bytes if that fails.
//! 5. The temp store deletes every file it created.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::config::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(std::env::temp_dir());
//! let app = pdfmerge::server::router(&config);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod compress;
pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod server;
pub mod upload;
pub mod utils;
pub mod validation;


// Re-export commonly used types
pub use config::Config;
pub use error::{MergeError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
