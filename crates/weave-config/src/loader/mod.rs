//! Manifest and descriptor lookup for a directory
//!
//! `probe_*` lookups tolerate absence and are used to find out what a
//! directory is. `load_manifest` and `find_workspace` assert that the
//! document exists and fail otherwise.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use weave_core::error::WeaveError;
use weave_core::{DESCRIPTOR_NAME, MANIFEST_NAME};

use crate::{descriptor, manifest, ConfigResult, ModuleManifest, WorkspaceDescriptor};

/// Reads the documents belonging to one directory
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader for `dir`
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.dir.join(MANIFEST_NAME)
    }

    pub fn descriptor_path(&self) -> Utf8PathBuf {
        self.dir.join(DESCRIPTOR_NAME)
    }

    /// Check for a package.json without reading it
    pub fn has_manifest(&self) -> bool {
        self.manifest_path().is_file()
    }

    /// Check for a workspace.json without reading it
    pub fn has_workspace(&self) -> bool {
        self.descriptor_path().is_file()
    }

    /// Load the directory's own workspace.json, if there is one
    pub async fn probe_workspace(&self) -> ConfigResult<Option<WorkspaceDescriptor>> {
        if !self.has_workspace() {
            return Ok(None);
        }
        descriptor::load_from_file(&self.descriptor_path()).await.map(Some)
    }

    /// Load the nearest workspace.json, walking up from this directory
    pub async fn find_workspace(&self) -> ConfigResult<WorkspaceDescriptor> {
        let mut current = Some(self.dir.as_path());

        while let Some(dir) = current {
            let candidate = dir.join(DESCRIPTOR_NAME);
            if candidate.is_file() {
                debug!("Using workspace descriptor {}", candidate);
                return descriptor::load_from_file(&candidate).await;
            }
            // Reached filesystem root when parent is None
            current = dir.parent();
        }

        Err(WeaveError::MissingDescriptor {
            dir: self.dir.clone(),
        })
    }

    /// Load the directory's package.json, if there is one
    pub async fn probe_manifest(&self) -> ConfigResult<Option<ModuleManifest>> {
        if !self.has_manifest() {
            return Ok(None);
        }
        manifest::load_from_file(&self.manifest_path()).await.map(Some)
    }

    /// Load the directory's package.json, failing when it is missing
    pub async fn load_manifest(&self) -> ConfigResult<ModuleManifest> {
        self.probe_manifest()
            .await?
            .ok_or_else(|| WeaveError::MissingManifest {
                dir: self.dir.clone(),
            })
    }
}
