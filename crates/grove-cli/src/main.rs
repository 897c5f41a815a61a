//! # grove-cli
//!
//! Load-order resolver for content packages.
//!
//! This is the main entry point for the `grove` tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use grove_core::error::GroveResult;
use std::collections::HashMap;
use std::process::ExitCode;
use tracing::{error, info};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Resolve which content packages load, and in which order
#[derive(Parser)]
#[command(name = "grove", version, about = "Content package load-order resolver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this grove.toml instead of searching for one
    #[arg(short = 'C', long = "config", global = true, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Settings file with load_<name> entries
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<String>,

    /// Handling of deprecated declarations: ignore, log or error
    #[arg(long, global = true, value_name = "MODE")]
    pub deprecated: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and print the load order
    Order {
        #[arg(long)]
        json: bool,
    },
    /// List discovered packages and whether they are enabled
    List {
        #[arg(long)]
        json: bool,
    },
    /// Enable a package in the settings file
    Enable {
        name: String,
    },
    /// Disable a package in the settings file
    Disable {
        name: String,
    },
    /// Read or change a package's stored metadata
    Meta {
        package: String,
        #[command(subcommand)]
        action: MetaAction,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum MetaAction {
    /// Print one value
    Get { key: String },
    /// Store a value; an empty value removes the key
    Set { key: String, value: String },
    /// Remove a value
    Remove { key: String },
    /// Print every value
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting grove v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> GroveResult<()> {
    let mut overrides = HashMap::new();
    if let Some(settings) = cli.settings {
        overrides.insert("settings".to_string(), settings);
    }
    if let Some(deprecated) = cli.deprecated {
        overrides.insert("deprecated".to_string(), deprecated);
    }

    match cli.command {
        Some(Commands::Version) => commands::show_version(&output::OutputHandler::new()),
        Some(command) => {
            let ctx = CommandContext::new(cli.config.as_deref(), overrides)?;
            commands::dispatch_command(command, &ctx)
        },
        None => commands::show_help(&output::OutputHandler::new()),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "grove={level},grove_cli={level},grove_core={level},grove_config={level},grove_resolver={level}"
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("grove encountered an unexpected error: {}", panic_info);
        eprintln!("grove crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/grove-rs/grove/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
