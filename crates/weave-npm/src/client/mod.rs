//! npm subprocess client

use std::io::Write;
use std::process::Stdio;

use camino::Utf8Path;
use tokio::process::Command;
use tracing::{debug, warn};

use weave_core::error::WeaveError;

use crate::api::{parse_major_version, NpmArgs, ProcessOutput};
use crate::NpmResult;


/// The external installer, as seen by an install pass.
///
/// A run either succeeds with the captured output or fails with
/// `WeaveError::ExternalTool` holding the command line, exit status and
/// everything the tool printed.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    async fn run(&self, args: &[String], cwd: &Utf8Path) -> NpmResult<ProcessOutput>;
}

/// npm executed as a child process
#[derive(Debug, Clone)]
pub struct Npm {
    program: String,
    verbose: bool,
}

impl Default for Npm {
    fn default() -> Self {
        Self::new(default_program())
    }
}

impl Npm {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            verbose: false,
        }
    }

    /// Echo the tool's output as it is captured
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Major version reported by `npm -v`, 0 when it cannot be determined
    pub async fn detect_major_version(&self) -> u32 {
        let result = self.execute(&NpmArgs::version(), None).await;
        match result.map(|output| parse_major_version(&output.stdout)) {
            Ok(Some(major)) => {
                debug!("Detected npm major version {}", major);
                major
            }
            Ok(None) => {
                warn!("Unrecognized output from `{} -v`, assuming an old npm", self.program);
                0
            }
            Err(e) => {
                warn!("Failed to detect npm version: {}", e);
                0
            }
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn execute(&self, args: &[String], cwd: Option<&Utf8Path>) -> NpmResult<ProcessOutput> {
        let command_line = self.command_line(args);
        debug!("Running `{}`{}", command_line, cwd.map(|dir| format!(" in {}", dir)).unwrap_or_default());

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| WeaveError::ExternalTool {
            command: command_line.clone(),
            status: None,
            output: e.to_string(),
        })?;

        let output = ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if self.verbose {
            echo(&output);
        }

        if !output.success() {
            return Err(WeaveError::ExternalTool {
                command: command_line,
                status: output.status,
                output: output.combined(),
            });
        }

        Ok(output)
    }
}

impl PackageManager for Npm {
    async fn run(&self, args: &[String], cwd: &Utf8Path) -> NpmResult<ProcessOutput> {
        self.execute(args, Some(cwd)).await
    }
}

fn echo(output: &ProcessOutput) {
    // A closed stdout or stderr is not worth failing the install over
    let _ = std::io::stdout().write_all(output.stdout.as_bytes());
    let _ = std::io::stderr().write_all(output.stderr.as_bytes());
}

fn default_program() -> &'static str {
    if cfg!(windows) {
        "npm.cmd"
    } else {
        "npm"
    }
}
