//! Configuration for the merge server.
//!
//! This module turns CLI arguments into a validated [`Config`]. Upload size
//! limits are fixed for the lifetime of the process and are not exposed as
//! flags; [`SizeLimits::default`] is what production runs with.

use anyhow::{Context, Result, bail};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::utils::format_limit;

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Largest single upload accepted.
pub const MAX_FILE_SIZE_BYTES: u64 = 100 * MIB;

/// Largest aggregate upload accepted.
pub const MAX_REQUEST_SIZE_BYTES: u64 = 250 * MIB;

/// Extra room given to the raw request body on top of twice the aggregate
/// file limit, for multipart boundaries and part headers.
pub const BODY_LIMIT_HEADROOM_BYTES: u64 = 16 * MIB;

/// Upload size limits enforced on every merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    /// Reject any single file larger than this.
    pub max_file_size_bytes: u64,
    /// Reject the request if the sum of all file sizes is larger than this.
    pub max_request_size_bytes: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            max_request_size_bytes: MAX_REQUEST_SIZE_BYTES,
        }
    }
}

impl SizeLimits {
    /// Per-file limit as shown to clients, e.g. `"100MB"`.
    pub fn max_file_size_label(&self) -> String {
        format_limit(self.max_file_size_bytes)
    }

    /// Per-request limit as shown to clients, e.g. `"250MB"`.
    pub fn max_request_size_label(&self) -> String {
        format_limit(self.max_request_size_bytes)
    }

    /// Hard cap on the raw HTTP body.
    ///
    /// Set well above the aggregate limit: uploads past the aggregate limit
    /// are counted, not buffered, so the client gets `REQUEST_SIZE_EXCEEDED`
    /// with the real total. Only bodies past this cap are cut off mid-stream.
    pub fn body_limit_bytes(&self) -> usize {
        let limit = self
            .max_request_size_bytes
            .saturating_mul(2)
            .saturating_add(BODY_LIMIT_HEADROOM_BYTES);
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,

    /// The single origin allowed to make cross-origin requests.
    pub allowed_origin: HeaderValue,

    /// Directory where per-request scratch files are created.
    pub temp_dir: PathBuf,

    /// Upload size limits.
    pub limits: SizeLimits,

    /// Debug logging for the service.
    pub verbose: bool,
}

impl Config {
    /// Build a configuration for embedding the router (tests, other binaries).
    ///
    /// Binds to localhost on an ephemeral port and uses default limits.
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            allowed_origin: HeaderValue::from_static(crate::cli::DEFAULT_ALLOWED_ORIGIN),
            temp_dir: temp_dir.into(),
            limits: SizeLimits::default(),
            verbose: false,
        }
    }

    /// Replace the size limits.
    pub fn with_limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp directory is missing or not a directory,
    /// or if the limits are inconsistent.
    pub fn validate(&self) -> Result<()> {
        if !self.temp_dir.is_dir() {
            bail!(
                "Temp directory does not exist or is not a directory: {}",
                self.temp_dir.display()
            );
        }

        if self.limits.max_file_size_bytes == 0 {
            bail!("Per-file size limit must be positive");
        }

        if self.limits.max_request_size_bytes < self.limits.max_file_size_bytes {
            bail!(
                "Request size limit ({}) must not be smaller than the per-file limit ({})",
                self.limits.max_request_size_label(),
                self.limits.max_file_size_label()
            );
        }

        Ok(())
    }
}

impl TryFrom<&Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: &Cli) -> Result<Self> {
        let bind_addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
            .parse()
            .with_context(|| format!("Invalid bind address: {}:{}", cli.host, cli.port))?;

        let allowed_origin = HeaderValue::from_str(cli.allowed_origin.trim_end_matches('/'))
            .with_context(|| format!("Invalid allowed origin: {}", cli.allowed_origin))?;

        let temp_dir = cli.temp_dir.clone().unwrap_or_else(std::env::temp_dir);

        let config = Self {
            bind_addr,
            allowed_origin,
            temp_dir,
            limits: SizeLimits::default(),
            verbose: cli.verbose,
        };
        config.validate()?;

        Ok(config)
    }
}
