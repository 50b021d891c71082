//! `weave install` command implementation.
//!
//! Installs a module, or every member of a workspace, with npm. Dependencies
//! the workspace maps to a local directory are held by placeholders while npm
//! runs, then replaced by links (or copies) and installed in turn.

use camino::Utf8Path;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info};

use weave_config::{ConfigLoader, InstallOptions, ModuleManifest, WorkspaceDescriptor};
use weave_core::error::{WeaveError, WeaveResult};
use weave_core::utils::real_path;
use weave_core::{DependencyMap, InstallResult, DEPENDENCY_STORE, MANIFEST_NAME, POSTINSTALL_SCRIPT};
use weave_link::{Linker, ManifestStub, Materialized};
use weave_npm::{NpmArgs, PackageManager};
use weave_resolver::{classify, member_candidates, InstalledSet, PeerClosure};

use super::CommandContext;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Execute the `weave install` command
pub async fn execute(ctx: &CommandContext) -> WeaveResult<()> {
    let npm_major = ctx.npm.detect_major_version().await;
    let options = ctx.options.clone().with_npm_major(npm_major);

    let orchestrator = Orchestrator::new(&ctx.npm, &options);
    let installed = InstalledSet::new();
    let result = orchestrator.install(&ctx.cwd, &installed).await?;

    debug!(
        "Processed {} modules, linked {:?}, installed from alternate registries {:?}",
        installed.len(),
        result.linked.keys().collect::<Vec<_>>(),
        result.installed.keys().collect::<Vec<_>>()
    );
    Ok(())
}

/// Drives one install pass over modules and workspaces
pub struct Orchestrator<'a, P: PackageManager> {
    pm: &'a P,
    options: &'a InstallOptions,
    linker: Linker,
}

impl<'a, P: PackageManager> Orchestrator<'a, P> {
    pub fn new(pm: &'a P, options: &'a InstallOptions) -> Self {
        Self {
            pm,
            options,
            linker: Linker::from_options(options),
        }
    }

    /// Install `dir`: its workspace members first when it is a workspace, then
    /// the directory itself when it is a module.
    pub fn install<'s>(&'s self, dir: &'s Utf8Path, installed: &'s InstalledSet) -> BoxFuture<'s, WeaveResult<InstallResult>> {
        Box::pin(async move {
            let loader = ConfigLoader::new(dir);
            let own_workspace = loader.probe_workspace().await?;
            let mut result = InstallResult::new();

            if own_workspace.is_some() {
                info!("Installing workspace {}", dir);
                for member in member_candidates(dir, self.options.recursive)? {
                    result.merge(self.install(&member, installed).await?);
                }
            }

            if let Some(manifest) = loader.probe_manifest().await? {
                let workspace = match own_workspace {
                    Some(workspace) => workspace,
                    None => enclosing_workspace(dir).await?,
                };
                result.merge(self.install_module(dir, &workspace, &manifest, installed).await?);
            }

            Ok(result)
        })
    }

    /// Fully install a single module, linking workspace modules into it
    async fn install_module(
        &self,
        dir: &Utf8Path,
        workspace: &WorkspaceDescriptor,
        manifest: &ModuleManifest,
        installed: &InstalledSet,
    ) -> WeaveResult<InstallResult> {
        let real_dir = real_path(dir)?;
        if !installed.claim(&real_dir) {
            debug!("Module already processed {}", real_dir);
            return Ok(InstallResult::new());
        }

        let store = dir.join(DEPENDENCY_STORE);
        tokio::fs::create_dir_all(&store)
            .await
            .map_err(|e| WeaveError::io(format!("Failed to create {}", store), e))?;

        let deps = manifest.install_dependencies(self.options.production);
        debug!(
            "Installing direct dependencies {:?} for {}",
            deps.keys().collect::<Vec<_>>(),
            manifest.id()
        );

        let mut result = self
            .install_dependencies(dir, &deps, workspace, manifest, installed)
            .await?;

        // npm never reads peer dependencies of modules it did not install
        if !self.options.production {
            result.merge(
                self.resolve_linked_peers(dir, &deps, workspace, manifest, installed)
                    .await?,
            );
        }

        Ok(result)
    }

    async fn resolve_linked_peers(
        &self,
        dir: &Utf8Path,
        deps: &DependencyMap,
        workspace: &WorkspaceDescriptor,
        manifest: &ModuleManifest,
        installed: &InstalledSet,
    ) -> WeaveResult<InstallResult> {
        let store = dir.join(DEPENDENCY_STORE);
        let mut closure = PeerClosure::for_linked(deps, workspace);
        let mut result = InstallResult::new();

        while !closure.is_settled() {
            let mut discovered = DependencyMap::new();

            for name in closure.frontier().keys() {
                let package_path = store.join(name).join(MANIFEST_NAME);
                if !package_path.is_file() {
                    return Err(WeaveError::InvalidLinkedPackage { path: package_path });
                }
                let linked = weave_config::manifest::load_from_file(&package_path).await?;
                if linked.peer_dependencies.is_empty() {
                    continue;
                }

                debug!(
                    "Installing peer dependencies {:?} from {} into {}",
                    linked.peer_dependencies.keys().collect::<Vec<_>>(),
                    linked.id(),
                    dir
                );
                let round = self
                    .install_dependencies(dir, &linked.peer_dependencies, workspace, manifest, installed)
                    .await?;
                discovered.extend(round.linked.iter().map(|(name, spec)| (name.clone(), spec.clone())));
                result.merge(round);
            }

            closure.advance(discovered);
        }

        debug!(
            "Peer closure for {} settled after {} rounds",
            dir,
            closure.rounds()
        );
        Ok(result)
    }

    /// Install or link one set of dependencies into the module at `dir`
    async fn install_dependencies(
        &self,
        dir: &Utf8Path,
        deps: &DependencyMap,
        workspace: &WorkspaceDescriptor,
        manifest: &ModuleManifest,
        installed: &InstalledSet,
    ) -> WeaveResult<InstallResult> {
        let plan = classify(deps, workspace, dir);
        let mut result = InstallResult::new();

        for dep in &plan.registry {
            debug!(
                "Installing single module {}@{} from {} for module {}",
                dep.name, dep.version_spec, dep.registry, dir
            );
            if dep.dest.exists() {
                debug!("Already exists. Skipping {}", dep.name);
                continue;
            }
            let args = NpmArgs::install_from_registry(&dep.name, &dep.version_spec, &dep.registry);
            self.pm.run(&args, dir).await?;
            result.installed.insert(dep.name.clone(), dep.version_spec.clone());
        }

        let stub = ManifestStub::for_npm_major(self.options.npm_major);
        for dep in &plan.linked {
            debug!(
                "Stubbing mapped module {}@{} for module {}",
                dep.name, dep.version_spec, dir
            );
            self.linker.stage_placeholder(&dep.dest, &dep.source, stub)?;
        }

        info!("npm install for {}", dir);
        self.pm.run(&NpmArgs::install(self.options.production), dir).await?;
        self.post_install(manifest, dir).await?;

        for dep in &plan.linked {
            debug!(
                "Processing mapped module {}@{} for module {}",
                dep.name, dep.version_spec, dir
            );
            if self.linker.finalize(&dep.dest, &dep.source)? == Materialized::Linked {
                // A mapped directory must be a module
                let source_manifest = ConfigLoader::new(&dep.source).load_manifest().await?;
                self.post_install(&source_manifest, &dep.source).await?;
            }

            self.install(&dep.dest, installed).await?;
            result.linked.insert(dep.name.clone(), dep.version_spec.clone());
        }

        Ok(result)
    }

    /// Run the module's post-install script when it declares one
    async fn post_install(&self, manifest: &ModuleManifest, dir: &Utf8Path) -> WeaveResult<()> {
        if manifest.post_install_script().is_none() {
            return Ok(());
        }
        info!("npm run {} for {}", POSTINSTALL_SCRIPT, dir);
        self.pm.run(&NpmArgs::post_install(), dir).await?;
        Ok(())
    }
}

/// Nearest workspace descriptor above a module that has none of its own
async fn enclosing_workspace(dir: &Utf8Path) -> WeaveResult<WorkspaceDescriptor> {
    match dir.parent() {
        Some(parent) => ConfigLoader::new(parent).find_workspace().await,
        None => Err(WeaveError::MissingDescriptor {
            dir: dir.to_path_buf(),
        }),
    }
}
