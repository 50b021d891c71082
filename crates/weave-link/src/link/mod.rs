//! Destination inspection, placeholder staging and finalization
//!
//! A destination is absent, a symbolic link, a placeholder directory, or real
//! content. After an install pass it is always a link or real content.

pub mod linker;
pub mod state;

// Re-export main types
pub use linker::{LinkResult, Linker, Materialized};
pub use state::{DestinationState, ManifestStub, PLACEHOLDER_MARKER};
