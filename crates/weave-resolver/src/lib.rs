//! Dependency planning engine for weave
//!
//! This crate decides what an install pass does without touching the
//! dependency store: which directories are workspace members, how each
//! declared dependency is satisfied, which peer dependencies of linked
//! modules still need processing, and which modules were already installed.

pub mod classify;
pub mod closure;
pub mod installed;
pub mod traversal;

// Re-export main types
pub use classify::{classify, DependencyClassification, LinkedDep, RegistryDep};
pub use closure::PeerClosure;
pub use installed::InstalledSet;
pub use traversal::member_candidates;

use weave_core::error::WeaveError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, WeaveError>;
