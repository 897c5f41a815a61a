//! Configuration parsing for Grove
//!
//! This crate handles the flat key-value files that packages and worlds are
//! described with, the `grove.toml` tool configuration with its layering
//! rules, and the per-package metadata store.

pub mod kv;
pub mod merge;
pub mod metadata;
pub mod toml;

mod atomic;

// Re-export main types
pub use kv::KvFile;
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use metadata::PackageMetadata;
pub use crate::toml::{DiagnosticsSection, GroveToml, PathsSection};

use grove_core::error::GroveError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, GroveError>;
