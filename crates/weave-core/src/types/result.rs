//! Result of installing a module or a dependency set.

use super::DependencyMap;

/// What an install pass linked and fetched from alternate registries.
///
/// Returned up the recursion so callers can fold newly linked names into
/// further peer closure rounds.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// Dependencies materialized from the workspace link table
    pub linked: DependencyMap,
    /// Dependencies installed from an alternate registry
    pub installed: DependencyMap,
}

impl InstallResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another result into this one; later entries win on name clashes
    pub fn merge(&mut self, other: InstallResult) {
        self.linked.extend(other.linked);
        self.installed.extend(other.installed);
    }

    pub fn is_empty(&self) -> bool {
        self.linked.is_empty() && self.installed.is_empty()
    }
}
