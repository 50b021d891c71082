//! workspace.json descriptor parsing and normalization

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Deserialize;
use weave_core::error::WeaveError;
use weave_core::utils::normalize_path;

use crate::ConfigResult;

/// workspace.json as written on disk
#[derive(Debug, Default, Deserialize)]
struct WorkspaceJson {
    /// Module name -> directory, relative to the descriptor or absolute
    #[serde(default)]
    links: IndexMap<String, Utf8PathBuf>,

    /// Module name -> registry URL
    #[serde(default)]
    repos: IndexMap<String, String>,
}

/// A loaded workspace descriptor with every link path made absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceDescriptor {
    /// Directory holding the descriptor file
    pub root: Utf8PathBuf,
    /// Module name -> absolute source directory
    pub links: IndexMap<String, Utf8PathBuf>,
    /// Module name -> alternate registry URL
    pub repos: IndexMap<String, String>,
}

impl WorkspaceDescriptor {
    /// Create an empty descriptor rooted at `root`
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            links: IndexMap::new(),
            repos: IndexMap::new(),
        }
    }

    /// Map `name` to a directory, resolved against the workspace root
    pub fn with_link(mut self, name: impl Into<String>, path: impl AsRef<Utf8Path>) -> Self {
        let source = normalize_path(&self.root.join(path.as_ref()));
        self.links.insert(name.into(), source);
        self
    }

    /// Fetch `name` from an alternate registry
    pub fn with_repo(mut self, name: impl Into<String>, registry: impl Into<String>) -> Self {
        self.repos.insert(name.into(), registry.into());
        self
    }

    /// Source directory `name` links to
    pub fn link_source(&self, name: &str) -> Option<&Utf8Path> {
        self.links.get(name).map(Utf8PathBuf::as_path)
    }

    /// Alternate registry `name` is fetched from
    pub fn registry(&self, name: &str) -> Option<&str> {
        self.repos.get(name).map(String::as_str)
    }

    pub fn is_linked(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }
}

/// Parse a workspace.json document located in `root`
pub fn parse_descriptor(content: &str, root: &Utf8Path, path: &Utf8Path) -> ConfigResult<WorkspaceDescriptor> {
    let raw: WorkspaceJson = serde_json::from_str(content).map_err(|e| WeaveError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let descriptor = raw
        .links
        .into_iter()
        .fold(WorkspaceDescriptor::new(root), |descriptor, (name, dir)| {
            descriptor.with_link(name, dir)
        });

    Ok(WorkspaceDescriptor {
        repos: raw.repos,
        ..descriptor
    })
}

/// Load workspace.json from the given file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<WorkspaceDescriptor> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| WeaveError::io(format!("Failed to read {}", path), e))?;

    let root = path.parent().unwrap_or(Utf8Path::new("."));
    parse_descriptor(&content, root, path)
}
