//! Diagnostic messages and reporting policy.
//!
//! Everything that does not abort a resolution is collected as a
//! [`Diagnostic`] and handed back to the caller for logging.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A package could not be loaded or could not be found
    Error,
    /// A package loads but something about it needs attention
    Warning,
    /// Informational, e.g. a layered override
    Info,
}

/// A single non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// How deprecation notices recorded on a package are handled at finalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecatedHandling {
    /// Drop the notices silently
    Ignore,
    /// Report the notices as a warning
    #[default]
    Log,
    /// Refuse to load the package
    Error,
}

impl Diagnostic {
    /// Create an error-level diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Create a warning-level diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an info-level diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

impl FromStr for DeprecatedHandling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" | "none" => Ok(DeprecatedHandling::Ignore),
            "log" | "warn" => Ok(DeprecatedHandling::Log),
            "error" => Ok(DeprecatedHandling::Error),
            other => Err(format!(
                "unknown deprecated handling mode '{}', expected ignore, log or error",
                other
            )),
        }
    }
}

impl fmt::Display for DeprecatedHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeprecatedHandling::Ignore => "ignore",
            DeprecatedHandling::Log => "log",
            DeprecatedHandling::Error => "error",
        };
        f.write_str(label)
    }
}
