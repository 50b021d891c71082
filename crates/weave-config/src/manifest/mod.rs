//! package.json module manifest parsing

use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use weave_core::error::WeaveError;
use weave_core::types::DependencyMap;
use weave_core::POSTINSTALL_SCRIPT;

use crate::ConfigResult;

/// The parts of a package.json the linker reads.
///
/// Every field is optional in the document; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Package name
    #[serde(default)]
    pub name: String,

    /// Package version
    #[serde(default)]
    pub version: String,

    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: DependencyMap,

    /// Development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: DependencyMap,

    /// Peer dependencies
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: DependencyMap,

    /// npm scripts
    #[serde(default)]
    pub scripts: IndexMap<String, String>,
}

impl ModuleManifest {
    /// Dependencies an install pass processes for this module.
    ///
    /// `devDependencies` are merged over `dependencies` unless `production`.
    pub fn install_dependencies(&self, production: bool) -> DependencyMap {
        let mut deps = self.dependencies.clone();
        if !production {
            deps.extend(
                self.dev_dependencies
                    .iter()
                    .map(|(name, spec)| (name.clone(), spec.clone())),
            );
        }
        deps
    }

    /// Command of the post-install hook, if the module declares one
    pub fn post_install_script(&self) -> Option<&str> {
        self.scripts.get(POSTINSTALL_SCRIPT).map(String::as_str)
    }

    /// `name@version` for log lines
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Parse a package.json document
pub fn parse_manifest(content: &str, path: &Utf8Path) -> ConfigResult<ModuleManifest> {
    serde_json::from_str(content).map_err(|e| WeaveError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and parse package.json from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<ModuleManifest> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| WeaveError::io(format!("Failed to read {}", path), e))?;

    parse_manifest(&content, path)
}
