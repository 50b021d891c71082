//! `weave clean` command implementation.
//!
//! Removes `node_modules` from a module, or from every member of a workspace.
//! Only the presence of workspace.json and package.json is checked, so
//! modules with broken manifests can still be cleaned.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use weave_config::ConfigLoader;
use weave_core::error::{WeaveError, WeaveResult};
use weave_core::DEPENDENCY_STORE;
use weave_resolver::member_candidates;

use super::CommandContext;

/// Execute the `weave clean` command
pub async fn execute(ctx: &CommandContext) -> WeaveResult<()> {
    let removed = clean(&ctx.cwd, ctx.options.recursive).await?;
    if removed.is_empty() {
        ctx.output.info("Nothing to clean");
    }
    Ok(())
}

/// Clean `dir` and, when it is a workspace, its members. Returns the removed
/// dependency stores in removal order.
pub async fn clean(dir: &Utf8Path, recursive: bool) -> WeaveResult<Vec<Utf8PathBuf>> {
    let mut removed = Vec::new();

    if ConfigLoader::new(dir).has_workspace() {
        info!("Cleaning workspace {}", dir);
        let mut members = member_candidates(dir, recursive)?;
        // Deeper paths first, less likely to break links on Windows
        members.sort_by(|a, b| b.as_str().len().cmp(&a.as_str().len()));

        for member in &members {
            removed.extend(clean_module(member).await?);
        }
    }

    removed.extend(clean_module(dir).await?);
    Ok(removed)
}

async fn clean_module(dir: &Utf8Path) -> WeaveResult<Option<Utf8PathBuf>> {
    if !ConfigLoader::new(dir).has_manifest() {
        return Ok(None);
    }
    info!("Cleaning module {}", dir);

    let store = dir.join(DEPENDENCY_STORE);
    match tokio::fs::symlink_metadata(&store).await {
        Ok(metadata) if metadata.file_type().is_symlink() || metadata.is_file() => {
            tokio::fs::remove_file(&store)
                .await
                .map_err(|e| WeaveError::io(format!("Failed to remove {}", store), e))?;
        }
        Ok(_) => {
            tokio::fs::remove_dir_all(&store)
                .await
                .map_err(|e| WeaveError::io(format!("Failed to remove {}", store), e))?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(WeaveError::io(format!("Failed to inspect {}", store), e)),
    }

    Ok(Some(store))
}
