//! `grove order` command implementation.
//!
//! Runs the full configuration flow and prints the resulting load order
//! together with every diagnostic.

use super::CommandContext;
use grove_config::ConfigSource;
use grove_core::error::{GroveError, GroveResult};
use grove_resolver::{configure, ConfigureOptions};

/// Execute the `grove order` command
pub fn execute(json: bool, ctx: &CommandContext) -> GroveResult<()> {
    let options = ConfigureOptions::from_config(&ctx.config);
    let configured = configure(&options)?;

    if json {
        let text = serde_json::to_string_pretty(&configured)
            .map_err(|e| GroveError::io("Failed to encode load order".to_string(), e.into()))?;
        ctx.output.data(&text);
        return Ok(());
    }

    match &ctx.source {
        ConfigSource::Project(path) => ctx.output.info(&format!("Configuration: {}", path)),
        ConfigSource::Defaults(dir) => ctx.output.info(&format!("Configuration: defaults in {}", dir)),
    }

    for diagnostic in configured.diagnostics() {
        ctx.output.diagnostic(diagnostic);
    }

    let result = configured.result();
    ctx.output.step("🌳", "Load order:");
    for (position, spec) in result.sorted().iter().enumerate() {
        ctx.output.data(&format!("{:>4}. {} ({})", position + 1, spec.name, spec.location));
    }

    if configured.has_errors() {
        ctx.output.warn(&format!(
            "{} packages will load, {} could not be loaded",
            result.sorted().len(),
            result.unsatisfied().len()
        ));
    } else {
        ctx.output.success(&format!("{} packages will load", result.sorted().len()));
    }

    Ok(())
}
