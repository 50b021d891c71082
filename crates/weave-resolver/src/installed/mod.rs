//! Modules already installed during one invocation

use camino::{Utf8Path, Utf8PathBuf};
use dashmap::DashSet;

/// Real paths of modules whose install already started in this run.
///
/// Keyed by canonical path, so a module reached through a link and through
/// its own directory is installed once. Membership test and insertion are a
/// single atomic step.
#[derive(Debug, Default)]
pub struct InstalledSet {
    paths: DashSet<Utf8PathBuf>,
}

impl InstalledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `real_path`; false if it was claimed before
    pub fn claim(&self, real_path: &Utf8Path) -> bool {
        self.paths.insert(real_path.to_path_buf())
    }

    pub fn contains(&self, real_path: &Utf8Path) -> bool {
        self.paths.contains(real_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
