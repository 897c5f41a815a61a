//! grove.toml configuration parsing and serialization

use crate::ConfigResult;
use camino::{Utf8Path, Utf8PathBuf};
use grove_core::error::GroveError;
use grove_core::types::DeprecatedHandling;
use serde::{Deserialize, Serialize};

/// Settings file used when none is configured
pub const DEFAULT_SETTINGS_FILE: &str = "mods.conf";

/// Metadata directory used when none is configured
pub const DEFAULT_STORAGE_DIR: &str = "mod_storage";

/// Addon root used when none is configured
pub const DEFAULT_ADDON_ROOT: &str = "mods";

/// Complete grove.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroveToml {
    /// Search roots and state files
    #[serde(default)]
    pub paths: PathsSection,

    /// Diagnostic policy
    #[serde(default)]
    pub diagnostics: DiagnosticsSection,
}

/// Search roots and state files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsSection {
    /// Roots whose packages are always loaded, lowest precedence first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub builtin: Vec<Utf8PathBuf>,

    /// Roots filtered through the settings file, lowest precedence first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<Utf8PathBuf>,

    /// Enable/disable settings file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Utf8PathBuf>,

    /// Per-package metadata directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Utf8PathBuf>,
}

/// Diagnostic policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsSection {
    /// What to do with deprecated declaration formats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<DeprecatedHandling>,
}

impl GroveToml {
    /// Configuration used when no grove.toml exists
    pub fn with_defaults() -> Self {
        Self {
            paths: PathsSection {
                builtin: Vec::new(),
                addons: vec![Utf8PathBuf::from(DEFAULT_ADDON_ROOT)],
                settings: Some(Utf8PathBuf::from(DEFAULT_SETTINGS_FILE)),
                storage: Some(Utf8PathBuf::from(DEFAULT_STORAGE_DIR)),
            },
            diagnostics: DiagnosticsSection::default(),
        }
    }

    /// Settings file path, falling back to the default name
    pub fn settings_path(&self) -> Utf8PathBuf {
        self.paths
            .settings
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Metadata directory, falling back to the default name
    pub fn storage_path(&self) -> Utf8PathBuf {
        self.paths
            .storage
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    pub fn deprecated_handling(&self) -> DeprecatedHandling {
        self.diagnostics.deprecated.unwrap_or_default()
    }

    /// Anchor every relative path at `base`
    pub fn resolve_paths(&mut self, base: &Utf8Path) {
        let anchor = |path: &mut Utf8PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        self.paths.builtin.iter_mut().for_each(anchor);
        self.paths.addons.iter_mut().for_each(anchor);
        self.paths.settings.iter_mut().for_each(anchor);
        self.paths.storage.iter_mut().for_each(anchor);
    }
}

/// Parse TOML string to GroveToml configuration
pub fn parse_grove_toml(content: &str) -> ConfigResult<GroveToml> {
    // First try with toml_edit for better error reporting
    content.parse::<toml_edit::DocumentMut>().map_err(|e| {
        let (line, column) = locate(content, e.span().map(|s| s.start));
        GroveError::TomlParse {
            message: format!("TOML syntax error: {}", e.message()),
            line,
            column,
        }
    })?;

    // Then parse with serde for type safety
    let config: GroveToml = toml::from_str(content).map_err(|e| {
        let (line, column) = locate(content, e.span().map(|s| s.start));
        GroveError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize GroveToml to TOML string
pub fn serialize_grove_toml(config: &GroveToml) -> ConfigResult<String> {
    toml::to_string_pretty(config).map_err(|e| GroveError::ConfigValidation {
        field: "grove.toml".to_string(),
        reason: format!("TOML serialization error: {}", e),
    })
}

/// Validate configuration completeness
pub fn validate_config(config: &GroveToml) -> ConfigResult<()> {
    if let Some(settings) = &config.paths.settings {
        if settings.as_str().trim().is_empty() {
            return Err(GroveError::ConfigValidation {
                field: "paths.settings".to_string(),
                reason: "settings file path must not be empty".to_string(),
            });
        }
    }

    if let Some(storage) = &config.paths.storage {
        if storage.as_str().trim().is_empty() {
            return Err(GroveError::ConfigValidation {
                field: "paths.storage".to_string(),
                reason: "storage directory must not be empty".to_string(),
            });
        }
    }

    for (field, roots) in [("paths.builtin", &config.paths.builtin), ("paths.addons", &config.paths.addons)] {
        if roots.iter().any(|root| root.as_str().trim().is_empty()) {
            return Err(GroveError::ConfigValidation {
                field: field.to_string(),
                reason: "search roots must not be empty strings".to_string(),
            });
        }
    }

    Ok(())
}

/// Load and parse grove.toml from file path, anchoring paths at its directory
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<GroveToml> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GroveError::io(format!("Failed to read {}", path), e))?;

    let mut config = parse_grove_toml(&content).map_err(|e| match e {
        GroveError::TomlParse { message, line, column } => GroveError::TomlParse {
            message: format!("In file {}: {}", path, message),
            line,
            column,
        },
        GroveError::ConfigValidation { field, reason } => GroveError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    })?;

    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }

    Ok(config)
}

/// 1-based line and column of a byte offset
fn locate(content: &str, offset: Option<usize>) -> (usize, usize) {
    let Some(offset) = offset else {
        return (0, 0);
    };
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) + 1;
    (line, column)
}
