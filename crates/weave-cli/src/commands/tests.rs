//! Unit tests for CLI commands.

use super::clean::clean;
use super::install::Orchestrator;
use super::*;

use camino::Utf8Path;
use serde_json::json;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;
use weave_link::{DestinationState, PLACEHOLDER_MARKER};
use weave_npm::{NpmResult, PackageManager, ProcessOutput};
use weave_resolver::InstalledSet;

/// Records every npm invocation instead of running npm
#[derive(Default)]
struct FakeNpm {
    calls: Mutex<Vec<(Vec<String>, Utf8PathBuf)>>,
    /// Fail any run whose arguments contain this one
    fail_on: Option<&'static str>,
}

impl FakeNpm {
    fn failing_on(arg: &'static str) -> Self {
        Self {
            fail_on: Some(arg),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<(Vec<String>, Utf8PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    /// Real directories `npm install` ran in, in call order
    fn install_dirs(&self) -> Vec<Utf8PathBuf> {
        self.calls()
            .into_iter()
            .filter(|(args, _)| args.len() == 1 && args[0] == "install")
            .map(|(_, cwd)| Utf8PathBuf::from_path_buf(cwd.canonicalize().unwrap()).unwrap())
            .collect()
    }
}

impl PackageManager for FakeNpm {
    async fn run(&self, args: &[String], cwd: &Utf8Path) -> NpmResult<ProcessOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((args.to_vec(), cwd.to_path_buf()));

        if let Some(arg) = self.fail_on {
            if args.iter().any(|a| a == arg) {
                return Err(WeaveError::ExternalTool {
                    command: format!("npm {}", args.join(" ")),
                    status: Some(1),
                    output: "npm ERR! code E404".to_string(),
                });
            }
        }

        // A registry install leaves the package behind like npm would
        if args.len() == 4 && args[2] == "--registry" {
            let name = args[1].split('@').next().unwrap();
            fs::create_dir_all(cwd.join("node_modules").join(name)).unwrap();
        }

        Ok(ProcessOutput {
            status: Some(0),
            ..Default::default()
        })
    }
}

/// Canonical temporary root so link targets and claims compare cleanly
fn create_temp_root() -> (TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("Failed to create temp directory");
    let root = Utf8PathBuf::from_path_buf(temp.path().canonicalize().unwrap()).unwrap();
    (temp, root)
}

fn write_json(path: &Utf8Path, value: serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

/// W holds app, libX and libY; app depends on libX, libX on libY
fn create_workspace(root: &Utf8Path) -> Utf8PathBuf {
    let ws = root.join("W");
    write_json(
        &ws.join("workspace.json"),
        json!({ "links": { "libX": "./libX", "libY": "./libY" } }),
    );
    write_json(
        &ws.join("app/package.json"),
        json!({
            "name": "app",
            "version": "1.0.0",
            "dependencies": { "libX": "1.0.0" },
            "devDependencies": { "mocha": "^10.0.0" }
        }),
    );
    write_json(
        &ws.join("libX/package.json"),
        json!({ "name": "libX", "version": "1.0.0", "dependencies": { "libY": "1.0.0" } }),
    );
    write_json(
        &ws.join("libY/package.json"),
        json!({ "name": "libY", "version": "1.0.0" }),
    );
    ws
}

async fn run_install(npm: &FakeNpm, options: &InstallOptions, dir: &Utf8Path) -> WeaveResult<weave_core::InstallResult> {
    let orchestrator = Orchestrator::new(npm, options);
    let installed = InstalledSet::new();
    orchestrator.install(dir, &installed).await
}

#[test]
fn test_suggest_similar_command() {
    assert_eq!(suggest_similar_command("install"), Some("install".to_string()));
    assert_eq!(suggest_similar_command("instal"), Some("install".to_string()));
    assert_eq!(suggest_similar_command("claen"), Some("clean".to_string()));
    assert_eq!(suggest_similar_command("hlp"), Some("help".to_string()));

    assert_eq!(suggest_similar_command("xyz"), None);
    assert_eq!(suggest_similar_command("publish"), None);
}

#[test]
fn test_edit_distance() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("abc", "abc"), 0);
    assert_eq!(edit_distance("abc", "abcd"), 1);
    assert_eq!(edit_distance("install", "instal"), 1);
    assert_eq!(edit_distance("clean", "claen"), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_workspace_install_links_modules() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    let npm = FakeNpm::default();

    let result = run_install(&npm, &InstallOptions::default(), &ws).await.unwrap();

    // app, libX through app's link, libY through libX's link; members are
    // already claimed when the walk reaches them
    assert_eq!(
        npm.install_dirs(),
        vec![ws.join("app"), ws.join("libX"), ws.join("libY")]
    );

    let app_link = ws.join("app/node_modules/libX");
    assert_eq!(DestinationState::inspect(&app_link).unwrap(), DestinationState::Symlink);
    assert_eq!(fs::read_link(&app_link).unwrap(), std::path::Path::new("../../libX"));

    let lib_link = ws.join("libX/node_modules/libY");
    assert_eq!(DestinationState::inspect(&lib_link).unwrap(), DestinationState::Symlink);
    assert_eq!(fs::read_link(&lib_link).unwrap(), std::path::Path::new("../../libY"));

    // libY was linked by libX's own install, not into app
    assert_eq!(result.linked.keys().collect::<Vec<_>>(), vec!["libX"]);
    assert!(result.installed.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_is_idempotent() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);

    let first = FakeNpm::default();
    run_install(&first, &InstallOptions::default(), &ws).await.unwrap();
    let second = FakeNpm::default();
    run_install(&second, &InstallOptions::default(), &ws).await.unwrap();

    assert_eq!(first.install_dirs(), second.install_dirs());
    for dest in [ws.join("app/node_modules/libX"), ws.join("libX/node_modules/libY")] {
        assert_eq!(DestinationState::inspect(&dest).unwrap(), DestinationState::Symlink);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_second_install_with_same_set_is_noop() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    let npm = FakeNpm::default();
    let options = InstallOptions::default();
    let orchestrator = Orchestrator::new(&npm, &options);
    let installed = InstalledSet::new();

    let first = orchestrator.install(&ws, &installed).await.unwrap();
    let calls = npm.calls().len();
    assert!(!first.is_empty());
    assert_eq!(installed.len(), 3);

    let second = orchestrator.install(&ws, &installed).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(npm.calls().len(), calls);
    assert_eq!(installed.len(), 3);
}

#[cfg(unix)]
#[tokio::test]
async fn test_workspace_install_links_peers_of_linked_modules() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    write_json(
        &ws.join("app/package.json"),
        json!({ "name": "app", "version": "1.0.0", "dependencies": { "libX": "1.0.0" } }),
    );
    write_json(
        &ws.join("libX/package.json"),
        json!({ "name": "libX", "version": "1.0.0", "peerDependencies": { "libY": "2.0.0" } }),
    );

    let result = run_install(&FakeNpm::default(), &InstallOptions::default(), &ws)
        .await
        .unwrap();

    let app_store = ws.join("app/node_modules");
    assert_eq!(DestinationState::inspect(&app_store.join("libX")).unwrap(), DestinationState::Symlink);
    assert_eq!(fs::read_link(app_store.join("libX")).unwrap(), std::path::Path::new("../../libX"));
    assert_eq!(DestinationState::inspect(&app_store.join("libY")).unwrap(), DestinationState::Symlink);
    assert_eq!(fs::read_link(app_store.join("libY")).unwrap(), std::path::Path::new("../../libY"));

    assert_eq!(result.linked.get("libX").map(String::as_str), Some("1.0.0"));
    assert_eq!(result.linked.get("libY").map(String::as_str), Some("2.0.0"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_no_placeholder_survives_install() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    // A stale link and a leftover placeholder from an interrupted run
    fs::create_dir_all(ws.join("app/node_modules")).unwrap();
    std::os::unix::fs::symlink(root.join("gone"), ws.join("app/node_modules/libX")).unwrap();
    fs::create_dir_all(ws.join("libX/node_modules/libY")).unwrap();
    fs::write(ws.join("libX/node_modules/libY").join(PLACEHOLDER_MARKER), "").unwrap();

    run_install(&FakeNpm::default(), &InstallOptions::default(), &ws).await.unwrap();

    for dest in [ws.join("app/node_modules/libX"), ws.join("libX/node_modules/libY")] {
        assert_eq!(DestinationState::inspect(&dest).unwrap(), DestinationState::Symlink);
        assert!(dest.join("package.json").is_file());
        assert!(!dest.join(PLACEHOLDER_MARKER).exists());
    }
}

#[tokio::test]
async fn test_copy_mode_keeps_existing_copies() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    fs::create_dir_all(ws.join("libX/.git")).unwrap();
    fs::write(ws.join("libX/.git/HEAD"), "ref: refs/heads/main").unwrap();
    fs::write(ws.join("libX/.gitignore"), "node_modules").unwrap();
    fs::write(ws.join("libX/index.js"), "module.exports = 1;").unwrap();

    let options = InstallOptions {
        copy: true,
        remove_git: true,
        npm_major: 10,
        ..Default::default()
    };
    run_install(&FakeNpm::default(), &options, &ws).await.unwrap();

    let copy = ws.join("app/node_modules/libX");
    assert_eq!(DestinationState::inspect(&copy).unwrap(), DestinationState::Real);
    assert!(copy.join("index.js").is_file());
    assert!(!copy.join(".git").exists());
    assert!(!copy.join(".gitignore").exists());
    assert!(ws.join("libX/.git/HEAD").is_file());

    // Local edits to a copy survive the next install
    fs::write(copy.join("index.js"), "module.exports = 2;").unwrap();
    run_install(&FakeNpm::default(), &options, &ws).await.unwrap();
    assert_eq!(fs::read_to_string(copy.join("index.js")).unwrap(), "module.exports = 2;");
}

#[cfg(unix)]
#[tokio::test]
async fn test_peer_dependencies_of_linked_modules() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    write_json(
        &ws.join("libX/package.json"),
        json!({ "name": "libX", "version": "1.0.0", "peerDependencies": { "libY": "1.0.0" } }),
    );
    // libY peers back on libX; the closure must still settle
    write_json(
        &ws.join("libY/package.json"),
        json!({ "name": "libY", "version": "1.0.0", "peerDependencies": { "libX": "1.0.0" } }),
    );

    let result = run_install(&FakeNpm::default(), &InstallOptions::default(), &ws.join("app"))
        .await
        .unwrap();

    let peer = ws.join("app/node_modules/libY");
    assert_eq!(DestinationState::inspect(&peer).unwrap(), DestinationState::Symlink);
    assert_eq!(fs::read_link(&peer).unwrap(), std::path::Path::new("../../libY"));
    assert_eq!(result.linked.keys().collect::<Vec<_>>(), vec!["libX", "libY"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_production_skips_dev_and_peers() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    write_json(
        &ws.join("app/package.json"),
        json!({
            "name": "app",
            "dependencies": { "libX": "1.0.0" },
            "devDependencies": { "libY": "1.0.0" }
        }),
    );
    write_json(
        &ws.join("libX/package.json"),
        json!({ "name": "libX", "peerDependencies": { "libY": "1.0.0" } }),
    );

    let npm = FakeNpm::default();
    let options = InstallOptions {
        production: true,
        ..Default::default()
    };
    run_install(&npm, &options, &ws.join("app")).await.unwrap();

    assert!(ws.join("app/node_modules/libX").exists());
    assert!(!ws.join("app/node_modules/libY").exists());
    assert!(npm
        .calls()
        .iter()
        .all(|(args, _)| args == &vec!["install".to_string(), "--production".to_string()]));
}

#[tokio::test]
async fn test_registry_dependencies_installed_once() {
    let (_temp, root) = create_temp_root();
    let ws = root.join("W");
    write_json(
        &ws.join("workspace.json"),
        json!({ "repos": { "private-lib": "https://npm.example.com/" } }),
    );
    write_json(
        &ws.join("app/package.json"),
        json!({ "name": "app", "dependencies": { "private-lib": "^2.0.0", "lodash": "^4.17.21" } }),
    );

    let npm = FakeNpm::default();
    let result = run_install(&npm, &InstallOptions::default(), &ws).await.unwrap();
    assert_eq!(result.installed.get("private-lib").map(String::as_str), Some("^2.0.0"));

    let registry_calls = |npm: &FakeNpm| {
        npm.calls()
            .into_iter()
            .filter(|(args, _)| args.iter().any(|a| a == "--registry"))
            .count()
    };
    assert_eq!(registry_calls(&npm), 1);

    // The package is now present and is not fetched again
    let again = FakeNpm::default();
    let result = run_install(&again, &InstallOptions::default(), &ws).await.unwrap();
    assert_eq!(registry_calls(&again), 0);
    assert!(result.installed.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_post_install_hooks() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    write_json(
        &ws.join("app/package.json"),
        json!({
            "name": "app",
            "dependencies": { "libX": "1.0.0" },
            "scripts": { "weave:install": "node build.js" }
        }),
    );

    let npm = FakeNpm::default();
    run_install(&npm, &InstallOptions::default(), &ws.join("app")).await.unwrap();

    let hooks: Vec<_> = npm
        .calls()
        .into_iter()
        .filter(|(args, _)| args.first().map(String::as_str) == Some("run"))
        .collect();
    assert_eq!(
        hooks,
        vec![(vec!["run".to_string(), "weave:install".to_string()], ws.join("app"))]
    );
}

#[tokio::test]
async fn test_installer_failure_aborts() {
    let (_temp, root) = create_temp_root();
    let ws = create_workspace(&root);
    let npm = FakeNpm::failing_on("install");

    let err = run_install(&npm, &InstallOptions::default(), &ws).await.unwrap_err();

    assert!(err.is_external());
    assert!(err.to_string().contains("npm ERR! code E404"));
    // Nothing after the failed run in app was attempted
    assert_eq!(npm.calls().len(), 1);
    assert!(ws.join("app/node_modules/libX").join(PLACEHOLDER_MARKER).is_file());
}

#[tokio::test]
async fn test_module_outside_workspace_fails() {
    let (_temp, root) = create_temp_root();
    let module = root.join("lonely");
    write_json(&module.join("package.json"), json!({ "name": "lonely" }));

    let err = run_install(&FakeNpm::default(), &InstallOptions::default(), &module)
        .await
        .unwrap_err();
    assert!(matches!(err, WeaveError::MissingDescriptor { .. }));
}

/// W maps `ghost` to a directory without a package.json
fn create_ghost_workspace(root: &Utf8Path) -> Utf8PathBuf {
    let ws = root.join("W");
    write_json(&ws.join("workspace.json"), json!({ "links": { "ghost": "./ghost" } }));
    fs::create_dir_all(ws.join("ghost")).unwrap();
    write_json(
        &ws.join("app/package.json"),
        json!({ "name": "app", "dependencies": { "ghost": "1.0.0" } }),
    );
    ws
}

#[cfg(unix)]
#[tokio::test]
async fn test_linked_source_without_manifest_fails() {
    let (_temp, root) = create_temp_root();
    let ws = create_ghost_workspace(&root);

    for production in [false, true] {
        let options = InstallOptions {
            production,
            npm_major: 10,
            ..Default::default()
        };
        let err = run_install(&FakeNpm::default(), &options, &ws.join("app"))
            .await
            .unwrap_err();
        match err {
            WeaveError::MissingManifest { dir } => assert_eq!(dir, ws.join("ghost")),
            other => panic!("unexpected error (production: {production}): {other}"),
        }
    }
}

#[tokio::test]
async fn test_invalid_linked_package() {
    let (_temp, root) = create_temp_root();
    let ws = create_ghost_workspace(&root);

    // A copy is never read back, so the peer pass is the first to notice
    let options = InstallOptions {
        copy: true,
        npm_major: 10,
        ..Default::default()
    };
    let err = run_install(&FakeNpm::default(), &options, &ws.join("app"))
        .await
        .unwrap_err();
    match err {
        WeaveError::InvalidLinkedPackage { path } => {
            assert_eq!(path, ws.join("app/node_modules/ghost/package.json"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_plain_directory_is_ignored() {
    let (_temp, root) = create_temp_root();
    let npm = FakeNpm::default();

    let result = run_install(&npm, &InstallOptions::default(), &root).await.unwrap();
    assert!(result.is_empty());
    assert!(npm.calls().is_empty());
}

#[tokio::test]
async fn test_clean_removes_deeper_stores_first() {
    let (_temp, root) = create_temp_root();
    let ws = root.join("W");
    fs::create_dir_all(&ws).unwrap();
    fs::write(ws.join("workspace.json"), "{}").unwrap();
    fs::write(ws.join("package.json"), "{}").unwrap();
    for module in ["app", "packages/core"] {
        fs::create_dir_all(ws.join(module).join("node_modules/lodash")).unwrap();
        // Broken manifests are still cleaned
        fs::write(ws.join(module).join("package.json"), "{ not json").unwrap();
    }
    fs::create_dir_all(ws.join("node_modules")).unwrap();
    fs::create_dir_all(ws.join("docs/node_modules")).unwrap();

    let removed = clean(&ws, true).await.unwrap();

    assert_eq!(
        removed,
        vec![
            ws.join("packages/core/node_modules"),
            ws.join("app/node_modules"),
            ws.join("node_modules"),
        ]
    );
    // docs has no package.json and is left alone
    assert!(ws.join("docs/node_modules").exists());
}

#[tokio::test]
async fn test_clean_shallow_workspace() {
    let (_temp, root) = create_temp_root();
    let ws = root.join("W");
    fs::create_dir_all(ws.join("packages/core/node_modules")).unwrap();
    fs::write(ws.join("packages/core/package.json"), "{}").unwrap();
    fs::create_dir_all(ws.join("app/node_modules")).unwrap();
    fs::write(ws.join("app/package.json"), "{}").unwrap();
    fs::write(ws.join("workspace.json"), "{}").unwrap();

    let removed = clean(&ws, false).await.unwrap();

    assert_eq!(removed, vec![ws.join("app/node_modules")]);
    assert!(ws.join("packages/core/node_modules").exists());
}
