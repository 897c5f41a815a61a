//! `grove list` command implementation.
//!
//! Shows every discovered package, where it comes from and whether the
//! settings file enables it. Nothing is resolved and nothing is written.

use super::CommandContext;
use camino::Utf8PathBuf;
use grove_config::KvFile;
use grove_core::error::{GroveError, GroveResult};
use grove_core::types::PackageSpec;
use grove_resolver::{is_enabled, packages_in_path};
use serde::Serialize;

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub location: Utf8PathBuf,
    /// Builtin packages load regardless of the settings file
    pub builtin: bool,
    pub enabled: bool,
    pub release: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub description: String,
    pub depends: Vec<String>,
    pub optional_depends: Vec<String>,
}

impl ListEntry {
    fn new(spec: PackageSpec, builtin: bool, enabled: bool) -> Self {
        Self {
            name: spec.name,
            location: spec.location,
            builtin,
            enabled,
            release: spec.release,
            author: spec.author,
            description: spec.description,
            depends: spec.mandatory_deps.into_iter().collect(),
            optional_depends: spec.optional_deps.into_iter().collect(),
        }
    }
}

/// Collect the listing for the configured roots
pub fn collect(ctx: &CommandContext) -> GroveResult<Vec<ListEntry>> {
    let settings = KvFile::read(&ctx.config.settings_path())?;
    let mut entries = Vec::new();

    for root in &ctx.config.paths.builtin {
        for spec in packages_in_path(root)? {
            entries.push(ListEntry::new(spec, true, true));
        }
    }

    for root in &ctx.config.paths.addons {
        for spec in packages_in_path(root)? {
            let enabled = is_enabled(&settings, &spec.name);
            entries.push(ListEntry::new(spec, false, enabled));
        }
    }

    Ok(entries)
}

/// Execute the `grove list` command
pub fn execute(json: bool, ctx: &CommandContext) -> GroveResult<()> {
    let entries = collect(ctx)?;

    if json {
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|e| GroveError::io("Failed to encode package list".to_string(), e.into()))?;
        ctx.output.data(&text);
        return Ok(());
    }

    if entries.is_empty() {
        ctx.output.warn("No packages found in the configured roots");
        return Ok(());
    }

    for entry in &entries {
        let state = match (entry.builtin, entry.enabled) {
            (true, _) => "builtin",
            (false, true) => "enabled",
            (false, false) => "disabled",
        };
        ctx.output.data(&format!("{:<9} {:<24} {}", state, entry.name, entry.location));
    }

    let enabled = entries.iter().filter(|e| e.enabled).count();
    ctx.output.info(&format!("{} packages, {} enabled", entries.len(), enabled));
    Ok(())
}
