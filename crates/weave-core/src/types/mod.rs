//! Core data types for weave.
//!
//! This module provides the fundamental types used throughout the weave crates:
//! - Dependency maps as declared by module manifests
//! - The result accumulated by an install pass

pub mod dependency;
pub mod result;

// Re-export all public types
pub use dependency::DependencyMap;
pub use result::InstallResult;
