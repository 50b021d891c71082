//! Configuration loading for weave
//!
//! This crate reads the two documents the linker depends on: `package.json`
//! module manifests and the `workspace.json` descriptor, and carries the
//! options an install pass runs with.

pub mod descriptor;
pub mod loader;
pub mod manifest;
pub mod options;

// Re-export main types
pub use descriptor::WorkspaceDescriptor;
pub use loader::ConfigLoader;
pub use manifest::ModuleManifest;
pub use options::{InstallOptions, LinkMode};

use weave_core::error::WeaveError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, WeaveError>;
