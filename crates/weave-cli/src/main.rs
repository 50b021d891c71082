//! # weave
//!
//! Installs the modules of a multi-package npm workspace, linking modules that
//! live in the workspace into each other instead of fetching them.
//!
//! This is the main entry point for the weave CLI tool. It handles command
//! parsing, sets up logging and error handling, and dispatches to the
//! appropriate command handlers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;
use weave_core::error::WeaveError;

/// Install npm modules of a workspace, linking local modules into each other
#[derive(Parser)]
#[command(name = "weave", version, about = "Link and install the modules of an npm workspace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Copy modules instead of linking
    #[arg(short, long, global = true, env = "WEAVE_COPY")]
    pub copy: bool,

    /// Output verbose log
    #[arg(short, long, global = true, env = "WEAVE_VERBOSE")]
    pub verbose: bool,

    /// Remove .git directories during copy
    #[arg(short = 'g', long, global = true, env = "WEAVE_REMOVE_GIT")]
    pub remove_git: bool,

    /// Install only dependencies (no devDependencies)
    #[arg(short, long, global = true, env = "WEAVE_PRODUCTION")]
    pub production: bool,

    /// Follow all subdirectory paths for modules
    #[arg(short, long, global = true, env = "WEAVE_RECURSIVE")]
    pub recursive: bool,

    /// npm executable to run
    #[arg(long, global = true, value_name = "PATH", env = "WEAVE_NPM")]
    pub npm: Option<String>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true, value_name = "DIR", env = "WEAVE_DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install the module or workspace using local directories
    Install,
    /// Remove installed dependencies
    Clean,
    #[command(external_subcommand)]
    Other(Vec<String>),
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting weave v{}", env!("CARGO_PKG_VERSION"));

    if !run_cli(cli) {
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> bool {
    // Create Tokio runtime for async operations
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let err = WeaveError::io("Failed to create async runtime", e);
            eprintln!("{}", ErrorFormatter::new().format_error(&err));
            return false;
        }
    };

    rt.block_on(async {
        let ctx = match CommandContext::from_cli(&cli) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("{}", ErrorFormatter::new().format_error(&e));
                return false;
            }
        };

        match cli.command {
            Some(command) => commands::dispatch_command(command, &ctx).await,
            None => {
                commands::show_help();
                true
            }
        }
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "weave={level},weave_core={level},weave_config={level},weave_link={level},weave_resolver={level},weave_npm={level}"
        ))
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("weave encountered an unexpected error: {}", panic_info);
        eprintln!("weave crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
