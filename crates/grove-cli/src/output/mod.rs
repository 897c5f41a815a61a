//! Terminal output formatting and utilities.
//!
//! This module provides consistent output formatting across all commands,
//! including colors, diagnostics and error messages.

pub mod colors;
pub mod errors;

use grove_core::types::{Diagnostic, Severity};

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Create an output handler that never emits escape codes
    pub fn plain() -> Self {
        Self {
            colors: colors::ColorSupport::disabled(),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.colors.red("✗"), message);
    }

    /// Print a step message with emoji
    pub fn step(&self, emoji: &str, message: &str) {
        println!("{} {}", emoji, message);
    }

    /// Print data meant for other programs, without decoration
    pub fn data(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a diagnostic at its severity
    pub fn diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error(&diagnostic.message),
            Severity::Warning => self.warn(&diagnostic.message),
            Severity::Info => self.info(&diagnostic.message),
        }
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
