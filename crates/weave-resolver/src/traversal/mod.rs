//! Workspace member discovery
//!
//! Candidates are purely structural: every non-hidden directory below the
//! workspace root that is not a package manager's dependency store. Whether a
//! candidate is a module is decided by the caller.

use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use tracing::debug;
use walkdir::WalkDir;
use weave_core::error::WeaveError;
use weave_core::utils::to_utf8;
use weave_core::SKIPPED_STORES;

use crate::ResolverResult;

/// List candidate member directories under `root`.
///
/// Only immediate children are returned unless `recursive`. A hidden or store
/// `root` has no candidates. Symbolic links to directories are listed but not
/// descended into.
pub fn member_candidates(root: &Utf8Path, recursive: bool) -> ResolverResult<Vec<Utf8PathBuf>> {
    if root.file_name().is_some_and(is_excluded_name) {
        return Ok(Vec::new());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    // Entries shallower than min_depth never reach filter_entry
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_name(&entry.file_name().to_string_lossy()));

    let mut members = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            WeaveError::io(
                format!("Failed to list {}", root),
                io::Error::new(io::ErrorKind::Other, e.to_string()),
            )
        })?;

        if entry.path().is_dir() {
            members.push(to_utf8(entry.into_path())?);
        }
    }

    debug!("Found {} candidate members under {}", members.len(), root);
    Ok(members)
}

fn is_excluded_name(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_STORES.contains(&name)
}
