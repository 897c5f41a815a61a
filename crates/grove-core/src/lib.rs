//! # grove-core
//!
//! Core types and utilities shared across all Grove crates.
//!
//! This crate provides:
//! - PackageSpec, the description of one discovered content package
//! - Diagnostic and DeprecatedHandling for non-fatal reporting
//! - GroveError enum for unified error handling
//! - Name validation and path helpers
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (PackageSpec, Diagnostic, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{GroveError, GroveResult};
pub use types::{DeprecatedHandling, Diagnostic, PackageSpec, Severity};
