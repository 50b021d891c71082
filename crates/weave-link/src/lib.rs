//! Link materialization for weave
//!
//! This crate turns a linked dependency's destination inside a module's
//! dependency store into one of two final states: a symbolic link to the
//! mapped source directory, or a deep copy of it. Before the external
//! installer runs, destinations are held by placeholders so the installer
//! accepts names it could not otherwise resolve.

pub mod link;

// Re-export main types
pub use link::{DestinationState, LinkResult, Linker, ManifestStub, Materialized, PLACEHOLDER_MARKER};

use weave_core::error::WeaveError;

/// Result type for link operations
pub type LinkOpResult<T> = Result<T, WeaveError>;
