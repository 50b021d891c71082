//! Dependency classification against the workspace link and repo tables

use camino::{Utf8Path, Utf8PathBuf};
use weave_config::WorkspaceDescriptor;
use weave_core::types::DependencyMap;
use weave_core::DEPENDENCY_STORE;

/// A dependency satisfied from a directory in the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedDep {
    pub name: String,
    pub version_spec: String,
    /// Mapped source directory from the link table
    pub source: Utf8PathBuf,
    /// Location inside the module's dependency store
    pub dest: Utf8PathBuf,
}

/// A dependency fetched from an alternate registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDep {
    pub name: String,
    pub version_spec: String,
    pub registry: String,
    pub dest: Utf8PathBuf,
}

/// One dependency set split by how each entry is satisfied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyClassification {
    pub linked: Vec<LinkedDep>,
    pub registry: Vec<RegistryDep>,
    /// Left to the external installer untouched
    pub ordinary: Vec<(String, String)>,
}

impl DependencyClassification {
    pub fn is_empty(&self) -> bool {
        self.linked.is_empty() && self.registry.is_empty() && self.ordinary.is_empty()
    }

    pub fn linked_names(&self) -> impl Iterator<Item = &str> {
        self.linked.iter().map(|dep| dep.name.as_str())
    }
}

/// Classify `deps` of the module in `module_dir`.
///
/// A name in the link table is linked even when the repo table also lists it.
pub fn classify(deps: &DependencyMap, workspace: &WorkspaceDescriptor, module_dir: &Utf8Path) -> DependencyClassification {
    let store = module_dir.join(DEPENDENCY_STORE);
    let mut classification = DependencyClassification::default();

    for (name, version_spec) in deps {
        let dest = store.join(name);
        if let Some(source) = workspace.link_source(name) {
            classification.linked.push(LinkedDep {
                name: name.clone(),
                version_spec: version_spec.clone(),
                source: source.to_path_buf(),
                dest,
            });
        } else if let Some(registry) = workspace.registry(name) {
            classification.registry.push(RegistryDep {
                name: name.clone(),
                version_spec: version_spec.clone(),
                registry: registry.to_string(),
                dest,
            });
        } else {
            classification.ordinary.push((name.clone(), version_spec.clone()));
        }
    }

    classification
}
