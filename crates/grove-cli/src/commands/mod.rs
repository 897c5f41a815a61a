//! Command implementations and dispatch logic.
//!
//! This module contains all command handlers and the central dispatch system.
//! Each command is a function that takes a CommandContext.

use camino::{Utf8Path, Utf8PathBuf};
use grove_config::{ConfigLayering, ConfigLoader, ConfigSource, GroveToml};
use grove_core::error::{GroveError, GroveResult};
use std::collections::HashMap;
use tracing::{debug, info};

pub mod enable;
pub mod list;
pub mod meta;
pub mod order;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    /// Fully layered configuration, paths absolute
    pub config: GroveToml,
    pub source: ConfigSource,
}

impl CommandContext {
    /// Load and layer the configuration for the current directory
    pub fn new(config_path: Option<&Utf8Path>, cli_overrides: HashMap<String, String>) -> GroveResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| GroveError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| GroveError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("Current directory is not valid UTF-8: {}", e),
        })?;

        let loader = ConfigLoader::new(cwd.clone());
        let (project, source) = match config_path {
            Some(path) => loader.load_explicit(path)?,
            None => loader.load_project_config()?,
        };
        let global = loader.load_global_config()?;

        let mut config = ConfigLayering::merge_configs(
            global,
            project,
            ConfigLayering::collect_env_overrides(),
            cli_overrides,
        )?;
        // Environment and command line paths are relative to the working directory
        config.resolve_paths(&cwd);
        debug!("Using configuration from {:?}", source);

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            config,
            source,
        })
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> GroveResult<()> {
    match command {
        Commands::Order { json } => {
            info!("Resolving load order (json: {})", json);
            order::execute(json, ctx)
        },
        Commands::List { json } => {
            info!("Listing packages (json: {})", json);
            list::execute(json, ctx)
        },
        Commands::Enable { name } => {
            info!("Enabling package: {}", name);
            enable::execute(&name, true, ctx)
        },
        Commands::Disable { name } => {
            info!("Disabling package: {}", name);
            enable::execute(&name, false, ctx)
        },
        Commands::Meta { package, action } => {
            info!("Metadata command for package: {}", package);
            meta::execute(&package, action, ctx)
        },
        Commands::Version => show_version(&ctx.output),
    }
}

/// Show help information
pub fn show_help(output: &OutputHandler) -> GroveResult<()> {
    output.step("🌳", "grove - content package load-order resolver");
    output.info("");
    output.info("Usage: grove [OPTIONS] [COMMAND]");
    output.info("");
    output.info("Resolution:");
    output.info("  order          Resolve and print the load order");
    output.info("  list           List discovered packages");
    output.info("");
    output.info("Settings:");
    output.info("  enable <name>  Enable a package");
    output.info("  disable <name> Disable a package");
    output.info("  meta <pkg> ... Read or change stored package metadata");
    output.info("");
    output.info("Meta:");
    output.info("  version        Show version information");
    output.info("");
    output.info("Run 'grove <command> --help' for more information on a command.");
    Ok(())
}

pub fn show_version(output: &OutputHandler) -> GroveResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    output.step("🌳", &format!("grove v{}", version));
    output.info(&format!("Built: {}", build_date));
    output.info(&format!("Target: {}", target));
    output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}

/// Suggest the closest candidate within an edit distance of 2
pub fn suggest_similar<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in candidates {
        let distance = edit_distance(input, candidate);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(candidate);
        }
    }

    best_match
}

/// Calculate edit distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Two rows are enough
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
