//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;
use camino::{Utf8Path, Utf8PathBuf};
use grove_core::error::GroveError;
use grove_core::types::DeprecatedHandling;
use tracing::debug;
use crate::{ConfigResult, toml::GroveToml};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "grove.toml";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Project grove.toml file
    Project(Utf8PathBuf),
    /// No file found, built-in defaults anchored at this directory
    Defaults(Utf8PathBuf),
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load project configuration, falling back to defaults
    pub fn load_project_config(&self) -> ConfigResult<(GroveToml, ConfigSource)> {
        if let Some(path) = self.find_config_file(CONFIG_FILE_NAME) {
            debug!("Loading project configuration from {}", path);
            let config = crate::toml::load_from_file(&path)?;
            return Ok((config, ConfigSource::Project(path)));
        }

        debug!("No {} found, using defaults in {}", CONFIG_FILE_NAME, self.cwd);
        let mut config = GroveToml::with_defaults();
        config.resolve_paths(&self.cwd);
        Ok((config, ConfigSource::Defaults(self.cwd.clone())))
    }

    /// Load an explicitly named configuration file
    pub fn load_explicit(&self, path: &Utf8Path) -> ConfigResult<(GroveToml, ConfigSource)> {
        let path = if path.is_relative() {
            self.cwd.join(path)
        } else {
            path.to_path_buf()
        };
        let config = crate::toml::load_from_file(&path)?;
        Ok((config, ConfigSource::Project(path)))
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn find_config_file(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.is_file() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }

    /// Load global configuration
    pub fn load_global_config(&self) -> ConfigResult<Option<GroveToml>> {
        let Some(home_dir) = dirs::home_dir() else {
            debug!("Could not determine home directory, skipping global config");
            return Ok(None);
        };

        let global_config_path = Utf8PathBuf::try_from(home_dir)
            .map_err(|e| GroveError::ConfigValidation {
                field: "home_dir".to_string(),
                reason: format!("Invalid home directory path: {}", e),
            })?
            .join(".grove")
            .join("config.toml");

        if global_config_path.is_file() {
            debug!("Loading global configuration from {}", global_config_path);
            Ok(Some(crate::toml::load_from_file(&global_config_path)?))
        } else {
            Ok(None)
        }
    }
}

impl ConfigLayering {
    /// Merge multiple configuration layers
    pub fn merge_configs(
        global_config: Option<GroveToml>,
        project_config: GroveToml,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<GroveToml> {
        let mut merged = project_config;

        // Global config only fills what the project left unset
        if let Some(global) = global_config {
            if merged.paths.builtin.is_empty() {
                merged.paths.builtin = global.paths.builtin;
            }
            if merged.paths.addons.is_empty() {
                merged.paths.addons = global.paths.addons;
            }
            merged.paths.settings = merged.paths.settings.or(global.paths.settings);
            merged.paths.storage = merged.paths.storage.or(global.paths.storage);
            merged.diagnostics.deprecated =
                merged.diagnostics.deprecated.or(global.diagnostics.deprecated);
        }

        Self::apply_env_overrides(&mut merged, &env_overrides)?;

        // CLI flags have the highest priority
        Self::apply_cli_overrides(&mut merged, &cli_overrides)?;

        crate::toml::validate_config(&merged)?;

        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut GroveToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "GROVE_SETTINGS" => {
                    config.paths.settings = Some(Utf8PathBuf::from(value));
                }
                "GROVE_STORAGE" => {
                    config.paths.storage = Some(Utf8PathBuf::from(value));
                }
                "GROVE_DEPRECATED" => {
                    config.diagnostics.deprecated = Some(parse_handling("GROVE_DEPRECATED", value)?);
                }
                "GROVE_ADDON_PATH" => {
                    config.paths.addons = split_path_list(value);
                }
                "GROVE_BUILTIN_PATH" => {
                    config.paths.builtin = split_path_list(value);
                }
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut GroveToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "settings" => {
                    config.paths.settings = Some(Utf8PathBuf::from(value));
                }
                "storage" => {
                    config.paths.storage = Some(Utf8PathBuf::from(value));
                }
                "deprecated" => {
                    config.diagnostics.deprecated = Some(parse_handling("--deprecated", value)?);
                }
                _ => {
                    // Unknown CLI override, ignore
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with("GROVE_"))
            .collect()
    }
}

fn parse_handling(field: &str, value: &str) -> ConfigResult<DeprecatedHandling> {
    value.parse().map_err(|reason| GroveError::ConfigValidation {
        field: field.to_string(),
        reason,
    })
}

/// Split a PATH-style list, skipping empty and non-UTF-8 entries
fn split_path_list(value: &str) -> Vec<Utf8PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .filter_map(|p| Utf8PathBuf::from_path_buf(p).ok())
        .collect()
}
