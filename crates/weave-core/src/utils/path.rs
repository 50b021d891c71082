//! Path utilities shared by descriptor loading, traversal and the linker.

use crate::error::{WeaveError, WeaveResult};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::path::PathBuf;

/// Normalize a path by resolving . and .. components lexically
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {
                // Skip current directory
            },
            Utf8Component::ParentDir => match components.last() {
                Some(Utf8Component::Normal(_)) => {
                    components.pop();
                },
                // `/..` is `/`
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {},
                _ => components.push(component),
            },
            other => {
                components.push(other);
            },
        }
    }

    components.iter().collect()
}

/// Convert an OS path into a UTF-8 path
pub fn to_utf8(path: PathBuf) -> WeaveResult<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(WeaveError::non_utf8)
}

/// Resolve every symbolic link in `path`, yielding the canonical real path
pub fn real_path(path: &Utf8Path) -> WeaveResult<Utf8PathBuf> {
    path.canonicalize_utf8()
        .map_err(|e| WeaveError::io(format!("Failed to resolve real path of {}", path), e))
}
