//! PDF merging.
//!
//! [`MergeEngine`] loads staged inputs in upload order, concatenates their
//! page trees, and writes the result to a caller-chosen location.

mod merger;

pub use merger::{MergeEngine, MergeInput, MergeStatistics};
