//! Utility functions and helpers.
//!
//! Common functionality used across multiple Grove crates.

pub mod name;
pub mod path;

// Re-export commonly used utilities
pub use name::{is_name_char, is_valid_name, strip_modifiers};
pub use path::is_hidden;
