//! Per-package metadata storage.
//!
//! Each package may persist a flat map of string values. The map is stored
//! as one JSON object per package, in a file named after the package inside
//! a storage directory. Nothing here takes part in resolution.

use crate::{atomic::write_atomic, ConfigResult};
use camino::Utf8Path;
use grove_core::error::GroveError;
use grove_core::utils::is_valid_name;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use tracing::debug;

/// String key-value state owned by one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    package: String,
    vars: BTreeMap<String, String>,
    modified: bool,
}

impl PackageMetadata {
    /// Create an empty store for `package`
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            vars: BTreeMap::new(),
            modified: false,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Set a value; an empty value removes the key. Returns whether anything changed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        let value = value.into();

        let changed = if value.is_empty() {
            self.vars.remove(&name).is_some()
        } else if self.vars.get(&name) == Some(&value) {
            false
        } else {
            self.vars.insert(name, value);
            true
        };

        self.modified |= changed;
        changed
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.vars.remove(name).is_some();
        self.modified |= removed;
        removed
    }

    pub fn clear(&mut self) {
        self.vars.clear();
        self.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Write the store to `<root>/<package>`
    pub fn save(&mut self, root: &Utf8Path) -> ConfigResult<()> {
        let path = root.join(self.file_name()?);

        if root.exists() && !root.is_dir() {
            return Err(self.error(format!("unable to save, '{}' is not a directory", root)));
        }

        let json = serde_json::to_string(&self.vars)
            .map_err(|e| self.error(format!("failed to encode: {}", e)))?;

        write_atomic(&path, &json)?;
        self.modified = false;
        debug!("Saved {} metadata entries to {}", self.vars.len(), path);
        Ok(())
    }

    /// Replace the store with `<root>/<package>`. Returns `false` if no file exists.
    pub fn load(&mut self, root: &Utf8Path) -> ConfigResult<bool> {
        self.vars.clear();
        let path = root.join(self.file_name()?);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(GroveError::io(format!("Failed to read {}", path), e)),
        };

        let root_value: Value = serde_json::from_str(&content)
            .map_err(|e| self.error(format!("failed to read data (JSON decoding failure): {}", e)))?;

        let Value::Object(map) = root_value else {
            return Err(self.error("failed to read data: expected a JSON object".to_string()));
        };

        for (key, value) in map {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            self.vars.insert(key, value);
        }

        self.modified = false;
        Ok(true)
    }

    fn file_name(&self) -> ConfigResult<&str> {
        if is_valid_name(&self.package) {
            Ok(&self.package)
        } else {
            Err(self.error("package name is not usable as a file name".to_string()))
        }
    }

    fn error(&self, reason: String) -> GroveError {
        GroveError::Metadata {
            package: self.package.clone(),
            reason,
        }
    }
}
