//! `grove enable` and `grove disable` command implementation.
//!
//! Flips the `load_<name>` entry of one package in the settings file.

use super::{suggest_similar, CommandContext};
use grove_config::KvFile;
use grove_core::error::{GroveError, GroveResult};
use grove_core::utils::is_valid_name;
use grove_resolver::configure::SETTINGS_KEY_PREFIX;
use grove_resolver::packages_in_paths;

/// Execute `grove enable` (`enabled = true`) or `grove disable`
pub fn execute(name: &str, enabled: bool, ctx: &CommandContext) -> GroveResult<()> {
    let settings_path = ctx.config.settings_path();

    if !is_valid_name(name) {
        return Err(GroveError::InvalidName {
            name: name.to_string(),
            path: settings_path.to_string(),
        });
    }

    let known: Vec<String> = packages_in_paths(&ctx.config.paths.addons)?
        .into_iter()
        .flatten()
        .map(|spec| spec.name)
        .collect();

    if enabled && !known.iter().any(|n| n == name) {
        ctx.output.warn(&format!("Package '{}' is not in any addon root", name));
        if let Some(suggestion) = suggest_similar(name, known.iter().map(String::as_str)) {
            ctx.output.info(&format!("Did you mean '{}'?", suggestion));
        }
    }

    let mut settings = KvFile::read(&settings_path)?;
    let changed = settings.set_bool(format!("{}{}", SETTINGS_KEY_PREFIX, name), enabled);
    if changed {
        settings.update_file(&settings_path)?;
    }

    let verb = if enabled { "Enabled" } else { "Disabled" };
    if changed {
        ctx.output.success(&format!("{} {}", verb, name));
    } else {
        ctx.output.info(&format!("{} was already {}", name, verb.to_lowercase()));
    }
    Ok(())
}
