//! Flat `key = value` files.
//!
//! Package declarations (`mod.conf`) and the enable/disable settings file
//! share this format. Reading keeps the original line layout so that a
//! rewrite only touches the entries that changed: comments, blank lines and
//! unrecognized lines survive verbatim, updated keys are rewritten in place
//! and new keys are appended at the end.

use crate::{atomic::write_atomic, ConfigResult};
use camino::Utf8Path;
use grove_core::error::GroveError;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::ErrorKind;
use tracing::debug;


/// A parsed key-value file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvFile {
    /// Current values, in first-seen order
    entries: IndexMap<String, String>,
    /// Layout of the file as read
    lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry(String),
    Verbatim(String),
}

impl KvFile {
    /// Create an empty file
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file contents
    pub fn parse(content: &str) -> Self {
        let mut file = Self::new();

        for raw in content.lines() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                file.lines.push(Line::Verbatim(raw.to_string()));
                continue;
            }

            match trimmed.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    let key = key.trim().to_string();
                    file.entries.insert(key.clone(), value.trim().to_string());
                    file.lines.push(Line::Entry(key));
                },
                _ => {
                    debug!("Ignoring malformed line: {}", trimmed);
                    file.lines.push(Line::Verbatim(raw.to_string()));
                },
            }
        }

        file
    }

    /// Read a file from disk; a missing file reads as empty
    pub fn read(path: &Utf8Path) -> ConfigResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist, starting empty", path);
                Ok(Self::new())
            },
            Err(e) => Err(GroveError::io(format!("Failed to read {}", path), e)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set a value, returning whether anything changed
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if self.entries.get(&key) == Some(&value) {
            return false;
        }
        self.entries.insert(key, value);
        true
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) -> bool {
        self.set(key, if value { "true" } else { "false" })
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// All keys, in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the file, keeping the original layout
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut written: HashSet<&str> = HashSet::new();

        for line in &self.lines {
            match line {
                Line::Verbatim(raw) => {
                    out.push_str(raw);
                    out.push('\n');
                },
                Line::Entry(key) => {
                    // Removed keys and repeated keys are dropped
                    if let Some((key, value)) = self.entries.get_key_value(key.as_str()) {
                        if written.insert(key.as_str()) {
                            push_entry(&mut out, key, value);
                        }
                    }
                },
            }
        }

        for (key, value) in &self.entries {
            if written.insert(key.as_str()) {
                push_entry(&mut out, key, value);
            }
        }

        out
    }

    /// Write the file back to `path`, replacing it atomically
    pub fn update_file(&self, path: &Utf8Path) -> ConfigResult<()> {
        debug!("Writing {} entries to {}", self.entries.len(), path);
        write_atomic(path, &self.render())
    }
}

fn push_entry(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(" = ");
    out.push_str(value);
    out.push('\n');
}
