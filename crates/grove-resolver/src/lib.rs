//! Package discovery and load-order resolution for Grove
//!
//! This crate turns directories of content packages into a deterministic
//! load order:
//! - `declaration` reads one package directory into a `PackageSpec`
//! - `discovery` walks search roots and flattens package groups
//! - `overlay` merges packages from several roots, tracking name conflicts
//! - `graph` and `order` compute the load order and classify failures
//! - `configure` ties it together around an enable/disable settings file

pub mod configure;
pub mod declaration;
pub mod discovery;
pub mod graph;
pub mod order;
pub mod overlay;

// Re-export main types
pub use configure::{configure, is_enabled, ConfigureOptions, Configuration, Configured};
pub use declaration::parse_declaration;
pub use discovery::{discover, flatten, packages_in_path, packages_in_paths};
pub use graph::{CircularDependency, DependencyWalk, WalkOutcome};
pub use order::{resolve, ResolutionResult, Resolver};
pub use overlay::PackageSet;

use grove_core::error::GroveError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, GroveError>;
