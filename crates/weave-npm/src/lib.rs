//! npm invocation for weave
//!
//! This crate is the boundary to the external installer. It builds npm
//! argument lists, runs npm as a subprocess with captured output, and turns
//! abnormal exits into errors carrying everything npm printed.

pub mod api;
pub mod client;

// Re-export main types
pub use api::{parse_major_version, NpmArgs, ProcessOutput};
pub use client::{Npm, PackageManager};

use weave_core::error::WeaveError;

/// Result type for npm operations
pub type NpmResult<T> = Result<T, WeaveError>;
