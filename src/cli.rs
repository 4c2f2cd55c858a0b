//! CLI argument parsing for the merge server.
//!
//! Every flag can also be supplied through an environment variable so the
//! service can be configured from a container manifest.

use clap::Parser;
use std::path::PathBuf;

/// Origin of the browser client allowed to call the API.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://pdf-merger-galaxy-merger.vercel.app";

/// Merge uploaded PDF files into a single document over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "pdfmerge-api")]
#[command(version)]
#[command(about = "HTTP service that merges uploaded PDF files", long_about = None)]
pub struct Cli {
    /// Host address to bind to
    #[arg(long, env = "PDFMERGE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PDFMERGE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Origin allowed to make cross-origin requests
    ///
    /// Only this exact origin receives CORS headers; every other origin is
    /// refused by the browser.
    #[arg(long, env = "PDFMERGE_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    /// Directory for per-request scratch files
    ///
    /// Defaults to the operating system's temp directory.
    #[arg(long, env = "PDFMERGE_TEMP_DIR", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Enable debug logging for the service
    #[arg(short, long)]
    pub verbose: bool,
}
