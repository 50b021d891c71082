//! Utility functions and helpers.
//!
//! Common functionality used across multiple weave crates.

pub mod path;

// Re-export commonly used utilities
pub use path::{normalize_path, real_path, to_utf8};
