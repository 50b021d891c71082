//! Options an install or clean pass runs with.
//!
//! Built once at the command boundary from CLI flags and environment and
//! passed down by reference; nothing below the CLI reads global state.

/// How a linked dependency is materialized in the dependency store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkMode {
    /// Symbolic link to the mapped source directory
    #[default]
    Symlink,
    /// Deep copy of the mapped source directory
    Copy,
}

/// Install pass configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Materialize linked modules by copying instead of symlinking
    pub copy: bool,
    /// Strip `.git` and `.gitignore` from copied modules
    pub remove_git: bool,
    /// Skip devDependencies and peer closure resolution
    pub production: bool,
    /// Discover workspace members at any depth
    pub recursive: bool,
    /// Major version of the external installer, 0 when unknown
    pub npm_major: u32,
}

impl InstallOptions {
    pub fn link_mode(&self) -> LinkMode {
        if self.copy {
            LinkMode::Copy
        } else {
            LinkMode::Symlink
        }
    }

    pub fn with_npm_major(mut self, major: u32) -> Self {
        self.npm_major = major;
        self
    }
}
