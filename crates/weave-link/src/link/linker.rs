//! Linker implementation for placeholder, symlink and copy operations

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use tracing::{debug, info};
use walkdir::WalkDir;
use weave_config::{InstallOptions, LinkMode};
use weave_core::error::WeaveError;
use weave_core::utils::{real_path, to_utf8};
use weave_core::MANIFEST_NAME;

use super::state::{DestinationState, ManifestStub, PLACEHOLDER_MARKER};
use crate::LinkOpResult;

/// Version control metadata stripped from copies when requested
const GIT_METADATA: &[&str] = &[".git", ".gitignore"];

/// Outcome of finalizing a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// A fresh symbolic link now points at the source
    Linked,
    /// The source was copied into the destination
    Copied(LinkResult),
    /// The destination already held its final state
    Kept,
}

/// Materializes linked dependencies as symbolic links or copies
#[derive(Debug, Clone)]
pub struct Linker {
    mode: LinkMode,
    remove_git: bool,
}

impl Linker {
    pub fn new(mode: LinkMode, remove_git: bool) -> Self {
        Self { mode, remove_git }
    }

    pub fn from_options(options: &InstallOptions) -> Self {
        Self::new(options.link_mode(), options.remove_git)
    }

    /// Hold `dest` with a placeholder until the external installer has run.
    ///
    /// A symbolic link is replaced; real content and existing placeholders are
    /// left alone. Returns whether a placeholder was written.
    pub fn stage_placeholder(&self, dest: &Utf8Path, source: &Utf8Path, stub: ManifestStub) -> LinkOpResult<bool> {
        let mut state = DestinationState::inspect(dest)?;
        if state == DestinationState::Symlink {
            remove_destination(dest, state)?;
            state = DestinationState::Absent;
        }
        if state != DestinationState::Absent {
            return Ok(false);
        }

        fs::create_dir_all(dest)
            .map_err(|e| WeaveError::io(format!("Failed to create placeholder {}", dest), e))?;

        let stub_path = dest.join(MANIFEST_NAME);
        match stub {
            ManifestStub::Empty => fs::write(&stub_path, "{}")
                .map_err(|e| WeaveError::io(format!("Failed to write {}", stub_path), e))?,
            ManifestStub::Copy => {
                let real_manifest = source.join(MANIFEST_NAME);
                if !real_manifest.is_file() {
                    return Err(WeaveError::MissingManifest {
                        dir: source.to_path_buf(),
                    });
                }
                fs::copy(&real_manifest, &stub_path)
                    .map_err(|e| WeaveError::io(format!("Failed to copy {}", real_manifest), e))?;
            },
        }

        fs::write(dest.join(PLACEHOLDER_MARKER), "")
            .map_err(|e| WeaveError::io(format!("Failed to mark placeholder {}", dest), e))?;

        Ok(true)
    }

    /// Replace whatever the installer left at `dest` with the final link or copy
    pub fn finalize(&self, dest: &Utf8Path, source: &Utf8Path) -> LinkOpResult<Materialized> {
        match self.mode {
            LinkMode::Copy => self.finalize_copy(dest, source),
            LinkMode::Symlink => self.finalize_link(dest, source),
        }
    }

    fn finalize_copy(&self, dest: &Utf8Path, source: &Utf8Path) -> LinkOpResult<Materialized> {
        let state = DestinationState::inspect(dest)?;
        match state {
            DestinationState::Symlink | DestinationState::Placeholder => remove_destination(dest, state)?,
            // Existing copies are never overwritten
            DestinationState::Real => return Ok(Materialized::Kept),
            DestinationState::Absent => {},
        }

        info!("Copying {} from {}", dest, source);
        let result = self.copy_recursive(source.as_std_path(), dest.as_std_path())?;

        if self.remove_git {
            info!("Cleaning version control metadata from {}", dest);
            for name in GIT_METADATA {
                let path = dest.join(name);
                let state = DestinationState::inspect(&path)?;
                if state != DestinationState::Absent {
                    remove_destination(&path, state)?;
                }
            }
        }

        Ok(Materialized::Copied(result))
    }

    fn finalize_link(&self, dest: &Utf8Path, source: &Utf8Path) -> LinkOpResult<Materialized> {
        let state = DestinationState::inspect(dest)?;
        if state == DestinationState::Symlink {
            return Ok(Materialized::Kept);
        }
        if state != DestinationState::Absent {
            remove_destination(dest, state)?;
        }

        let target = link_target(dest, source)?;
        create_dir_symlink(&target, dest)?;
        info!("Created link {} -> {}", dest, source);

        Ok(Materialized::Linked)
    }

    pub fn copy_recursive(&self, source_dir: &std::path::Path, dest_dir: &std::path::Path) -> LinkOpResult<LinkResult> {
        let mut result = LinkResult::default();

        fs::create_dir_all(dest_dir)
            .map_err(|e| WeaveError::io("Failed to create destination directory", e))?;

        for entry in WalkDir::new(source_dir) {
            let entry = entry.map_err(|e| {
                WeaveError::io("Failed to walk directory", io::Error::new(io::ErrorKind::Other, e.to_string()))
            })?;
            let source_path = entry.path();

            let relative_path = source_path.strip_prefix(source_dir).map_err(|e| {
                WeaveError::io(
                    format!("Failed to strip prefix: {}", e),
                    io::Error::new(io::ErrorKind::Other, e.to_string()),
                )
            })?;

            if relative_path.as_os_str().is_empty() {
                continue;
            }

            let dest_path = dest_dir.join(relative_path);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest_path)
                    .map_err(|e| WeaveError::io("Failed to create directory", e))?;
                result.directories_created += 1;
            } else if entry.file_type().is_symlink() {
                let target = fs::read_link(source_path)
                    .map_err(|e| WeaveError::io("Failed to read symbolic link", e))?;
                create_symlink_raw(&target, &dest_path, source_path.is_dir())?;
                result.symlinks_created += 1;
            } else if entry.file_type().is_file() {
                if let Some(parent) = dest_path.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| WeaveError::io("Failed to create parent directory", e))?;
                }

                fs::copy(source_path, &dest_path).map_err(|e| WeaveError::io("Failed to copy file", e))?;
                result.files_copied += 1;
            }
        }

        debug!(
            "Copied {} files, {} directories, {} links",
            result.files_copied, result.directories_created, result.symlinks_created
        );
        Ok(result)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkResult {
    pub files_copied: usize,
    pub directories_created: usize,
    pub symlinks_created: usize,
}

/// Path stored in the link: `source` relative to the real parent of `dest`
fn link_target(dest: &Utf8Path, source: &Utf8Path) -> LinkOpResult<Utf8PathBuf> {
    let Some(parent) = dest.parent() else {
        return Ok(source.to_path_buf());
    };
    // `..` in a link is resolved from the parent's physical location
    let parent = real_path(parent)?;
    let source = if source.exists() {
        real_path(source)?
    } else {
        source.to_path_buf()
    };
    Ok(pathdiff::diff_utf8_paths(&source, &parent).unwrap_or(source))
}

fn remove_destination(dest: &Utf8Path, state: DestinationState) -> LinkOpResult<()> {
    let removed = match state {
        DestinationState::Absent => Ok(()),
        DestinationState::Symlink => remove_symlink(dest.as_std_path()),
        DestinationState::Placeholder | DestinationState::Real => {
            if dest.is_dir() {
                fs::remove_dir_all(dest)
            } else {
                fs::remove_file(dest)
            }
        },
    };
    removed.map_err(|e| WeaveError::io(format!("Failed to remove {}", dest), e))
}

#[cfg(unix)]
fn remove_symlink(path: &std::path::Path) -> io::Result<()> {
    fs::remove_file(path)
}

#[cfg(windows)]
fn remove_symlink(path: &std::path::Path) -> io::Result<()> {
    // Directory links are removed as directories on Windows
    fs::remove_dir(path).or_else(|_| fs::remove_file(path))
}

fn create_dir_symlink(target: &Utf8Path, link: &Utf8Path) -> LinkOpResult<()> {
    create_symlink_raw(target.as_std_path(), link.as_std_path(), true)
}

#[cfg(unix)]
fn create_symlink_raw(target: &std::path::Path, link: &std::path::Path, _is_dir: bool) -> LinkOpResult<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| symlink_error(link, e))
}

#[cfg(windows)]
fn create_symlink_raw(target: &std::path::Path, link: &std::path::Path, is_dir: bool) -> LinkOpResult<()> {
    let created = if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };
    created.map_err(|e| symlink_error(link, e))
}

fn symlink_error(link: &std::path::Path, e: io::Error) -> WeaveError {
    match to_utf8(link.to_path_buf()) {
        Ok(link) => WeaveError::io(format!("Failed to create link {}", link), e),
        Err(non_utf8) => non_utf8,
    }
}
