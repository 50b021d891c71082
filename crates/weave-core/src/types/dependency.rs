//! Dependency declaration types.
//!
//! Manifests declare dependencies as ordered `name -> version spec` maps. The
//! version spec is opaque here; the external installer interprets it.

use indexmap::IndexMap;

/// Dependencies in declaration order, keyed by package name
pub type DependencyMap = IndexMap<String, String>;
