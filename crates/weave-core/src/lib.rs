//! # weave-core
//!
//! Core types and utilities shared across all weave crates.
//!
//! This crate provides:
//! - `WeaveError` for unified error handling
//! - `InstallResult` and the dependency map type used by every install pass
//! - Path helpers for lexical normalization and UTF-8 conversion
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (dependency maps, install results)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{WeaveError, WeaveResult};
pub use types::{DependencyMap, InstallResult};

/// File name of the workspace descriptor.
pub const DESCRIPTOR_NAME: &str = "workspace.json";

/// File name of a module manifest.
pub const MANIFEST_NAME: &str = "package.json";

/// Directory the external installer populates inside each module.
pub const DEPENDENCY_STORE: &str = "node_modules";

/// Dependency stores of any package manager that traversal must never enter.
pub const SKIPPED_STORES: &[&str] = &["node_modules", "bower_components"];

/// Script a module may declare to run after it has been installed.
pub const POSTINSTALL_SCRIPT: &str = "weave:install";
