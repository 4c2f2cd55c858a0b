//! Upload size validation.
//!
//! [`SizeGuard`] checks upload metadata against the configured
//! [`SizeLimits`] before anything touches the filesystem. It is a pure
//! function of its inputs.
//!
//! # Examples
//!
//! ```
//! use pdfmerge::config::SizeLimits;
//! use pdfmerge::upload::FileMeta;
//! use pdfmerge::validation::SizeGuard;
//!
//! let guard = SizeGuard::new(SizeLimits::default());
//! let files = [FileMeta { filename: "a.pdf", size: 1024 }];
//! assert!(guard.validate(files).is_ok());
//! ```

use crate::config::SizeLimits;
use crate::error::{MergeError, Result};
use crate::upload::FileMeta;
use crate::utils::format_file_size;

/// Checks per-file and aggregate upload sizes.
#[derive(Debug, Clone, Copy)]
pub struct SizeGuard {
    limits: SizeLimits,
}

impl SizeGuard {
    /// Create a guard enforcing `limits`.
    pub fn new(limits: SizeLimits) -> Self {
        Self { limits }
    }

    /// Validate upload sizes.
    ///
    /// Files are checked in order and the first one over the per-file limit
    /// is reported. Only when every file passes is the aggregate checked.
    ///
    /// # Errors
    ///
    /// - [`MergeError::FileTooLarge`] naming the first oversized file.
    /// - [`MergeError::RequestTooLarge`] with the observed total.
    pub fn validate<'a, I>(&self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = FileMeta<'a>>,
    {
        let mut total: u64 = 0;

        for file in files {
            if file.size > self.limits.max_file_size_bytes {
                return Err(MergeError::FileTooLarge {
                    filename: file.filename.to_string(),
                    limit: self.limits.max_file_size_label(),
                });
            }
            total = total.saturating_add(file.size);
        }

        if total > self.limits.max_request_size_bytes {
            return Err(MergeError::RequestTooLarge {
                limit: self.limits.max_request_size_label(),
                actual: format_file_size(total),
            });
        }

        Ok(())
    }
}
