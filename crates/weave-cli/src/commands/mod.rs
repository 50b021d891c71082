//! Command implementations and dispatch logic.
//!
//! Each command is implemented as an async function that takes a
//! CommandContext. Dispatch turns the command's result into the final report
//! and the process exit status.

use camino::Utf8PathBuf;
use clap::CommandFactory;
use tracing::info;
use weave_config::InstallOptions;
use weave_core::error::{WeaveError, WeaveResult};
use weave_core::utils::{normalize_path, to_utf8};
use weave_npm::Npm;

pub mod clean;
pub mod install;

#[cfg(test)]
mod tests;

use crate::output::errors::ErrorFormatter;
use crate::{output::OutputHandler, Cli, Commands};

/// Shared context for all commands
pub struct CommandContext {
    /// Directory the command operates on
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    pub options: InstallOptions,
    pub npm: Npm,
}

impl CommandContext {
    /// Build the context from parsed flags and the process working directory
    pub fn from_cli(cli: &Cli) -> WeaveResult<Self> {
        let current = std::env::current_dir()
            .map_err(|e| WeaveError::io("Failed to get current directory", e))?;
        let cwd = match &cli.dir {
            Some(dir) => current.join(dir),
            None => current,
        };

        let options = InstallOptions {
            copy: cli.copy,
            remove_git: cli.remove_git,
            production: cli.production,
            recursive: cli.recursive,
            npm_major: 0,
        };

        let npm = match &cli.npm {
            Some(program) => Npm::new(program.clone()),
            None => Npm::default(),
        };

        Ok(Self {
            cwd: normalize_path(&to_utf8(cwd)?),
            output: OutputHandler::new(),
            options,
            npm: npm.with_verbose(cli.verbose),
        })
    }
}

/// Dispatch a command to its handler; returns whether it succeeded
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> bool {
    match command {
        Commands::Install => {
            info!("Installing {}", ctx.cwd);
            report(ctx, "Install failed", install::execute(ctx).await)
        }
        Commands::Clean => {
            info!("Cleaning {}", ctx.cwd);
            report(ctx, "Clean failed", clean::execute(ctx).await)
        }
        Commands::Other(args) => {
            let name = args.first().map(String::as_str).unwrap_or_default();
            ctx.output.error(&format!("Unknown command '{}'", name));
            if let Some(suggestion) = suggest_similar_command(name) {
                ctx.output.info(&format!("Did you mean '{}'?", suggestion));
            }
            ctx.output.info("");
            show_help();
            false
        }
    }
}

fn report(ctx: &CommandContext, failure: &str, result: WeaveResult<()>) -> bool {
    match result {
        Ok(()) => {
            ctx.output.success("Done, happy coding!");
            true
        }
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ctx.output.error(failure);
            false
        }
    }
}

/// Show help information
pub fn show_help() {
    let mut command = Cli::command();
    // Nothing sensible is left to do when stdout is gone
    let _ = command.print_help();
}

/// Suggest similar commands based on edit distance
pub fn suggest_similar_command(input: &str) -> Option<String> {
    let commands = ["install", "clean", "help"];

    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for &command in &commands {
        let distance = edit_distance(input, command);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(command);
        }
    }

    best_match.map(|s| s.to_string())
}

/// Calculate edit distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Two rows are enough for the Levenshtein recurrence
    let mut previous: Vec<usize> = (0..=b_len).collect();
    let mut current = vec![0; b_len + 1];

    for i in 1..=a_len {
        current[0] = i;
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_len]
}
