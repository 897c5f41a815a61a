//! Error types and result aliases for Grove operations.
//!
//! Provides a unified error type that covers every fatal condition across
//! discovery, configuration and resolution, with actionable messages.
//! Non-fatal findings are reported as [`crate::Diagnostic`]s instead.

use thiserror::Error;

/// Unified error type for all Grove operations
#[derive(Error, Debug)]
pub enum GroveError {
    // Package errors
    #[error(
        "Error loading package \"{name}\" at {path}: package name does not follow naming conventions: only characters [a-z0-9_] are allowed"
    )]
    InvalidName { name: String, path: String },

    #[error("Unresolved name conflicts for packages {}.", quote_list(.names))]
    NameConflict { names: Vec<String> },

    #[error("Package {name} at {path} uses deprecated declarations:\n\t{}", .notices.join("\n\t"))]
    DeprecatedFormat {
        name: String,
        path: String,
        notices: Vec<String>,
    },

    #[error("Package group nesting at {path} exceeds the limit of {limit} levels")]
    GroupTooDeep { path: String, limit: usize },

    // Config errors
    #[error("Failed to parse grove.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Metadata store errors
    #[error("Metadata for package '{package}': {reason}")]
    Metadata { package: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Grove operations
pub type GroveResult<T> = Result<T, GroveError>;

fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl GroveError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a name conflict error; names are reported sorted
    pub fn name_conflict<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self::NameConflict { names }
    }

    /// Check if this error aborts a whole resolution rather than one package
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GroveError::InvalidName { .. } | GroveError::NameConflict { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            GroveError::InvalidName { .. } => {
                Some("Rename the package in its mod.conf using only lowercase letters, digits and '_'")
            },
            GroveError::NameConflict { .. } => {
                Some("Remove one of the duplicate packages or install an override in a higher-precedence root")
            },
            GroveError::DeprecatedFormat { .. } => {
                Some("Move depends.txt and description.txt contents into mod.conf, or set diagnostics.deprecated = \"log\"")
            },
            GroveError::GroupTooDeep { .. } => {
                Some("Check for symlink loops between package groups")
            },
            GroveError::TomlParse { .. } => Some("Fix the TOML syntax at the reported location"),
            _ => None,
        }
    }
}
