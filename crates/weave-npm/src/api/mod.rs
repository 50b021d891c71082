//! npm command lines and captured process output

use weave_core::POSTINSTALL_SCRIPT;

/// Argument lists for the npm commands an install pass issues
pub struct NpmArgs;

impl NpmArgs {
    /// Full install of a module's dependencies
    pub fn install(production: bool) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        if production {
            args.push("--production".to_string());
        }
        args
    }

    /// Single package from an alternate registry
    pub fn install_from_registry(name: &str, version_spec: &str, registry: &str) -> Vec<String> {
        // cmd.exe would otherwise interpret range operators such as ^ and >
        let quote = if cfg!(windows) { "\"" } else { "" };
        vec![
            "install".to_string(),
            format!("{name}@{quote}{version_spec}{quote}"),
            "--registry".to_string(),
            registry.to_string(),
        ]
    }

    /// The post-install hook script
    pub fn post_install() -> Vec<String> {
        vec!["run".to_string(), POSTINSTALL_SCRIPT.to_string()]
    }

    pub fn version() -> Vec<String> {
        vec!["-v".to_string()]
    }
}

/// Captured result of one npm run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, None when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Major component of an `npm -v` answer such as `10.2.4`
pub fn parse_major_version(version: &str) -> Option<u32> {
    version.trim().split('.').next()?.parse().ok()
}
