//! Core data types for Grove package loading.
//!
//! This module provides the fundamental types used throughout Grove:
//! - Package specifications produced by discovery
//! - Diagnostics accumulated during configuration and resolution
//! - The deprecated-declaration handling policy

pub mod diagnostic;
pub mod spec;

// Re-export all public types
pub use diagnostic::{DeprecatedHandling, Diagnostic, Severity};
pub use spec::PackageSpec;
