//! Package specification types.
//!
//! A [`PackageSpec`] describes one package directory found by discovery:
//! its declared name and dependency sets, informational metadata, and the
//! unsatisfied sets filled in by the resolver.

use super::{DeprecatedHandling, Diagnostic};
use crate::error::{GroveError, GroveResult};
use crate::utils::name::is_valid_name;
use camino::Utf8PathBuf;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One discovered package (or package group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub location: Utf8PathBuf,

    /// Pure container whose members are the loadable packages
    #[serde(default)]
    pub is_group: bool,

    /// Members keyed by directory name, only populated for groups
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub group_members: BTreeMap<String, PackageSpec>,

    /// Discovered as a member of a group
    #[serde(default)]
    pub part_of_group: bool,

    #[serde(default)]
    pub mandatory_deps: IndexSet<String>,
    #[serde(default)]
    pub optional_deps: IndexSet<String>,

    /// Filled in by the resolver
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub unsatisfied_mandatory: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub unsatisfied_optional: IndexSet<String>,

    #[serde(default)]
    pub release: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deprecation_notices: Vec<String>,
}

impl PackageSpec {
    /// Create a spec with only the identifying fields set
    pub fn new(name: impl Into<String>, location: impl Into<Utf8PathBuf>, part_of_group: bool) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            is_group: false,
            group_members: BTreeMap::new(),
            part_of_group,
            mandatory_deps: IndexSet::new(),
            optional_deps: IndexSet::new(),
            unsatisfied_mandatory: IndexSet::new(),
            unsatisfied_optional: IndexSet::new(),
            release: 0,
            author: None,
            description: String::new(),
            deprecation_notices: Vec::new(),
        }
    }

    /// Add mandatory dependencies
    pub fn with_depends<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory_deps.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add optional dependencies
    pub fn with_optional_depends<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_deps.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether every mandatory dependency was resolved
    pub fn is_satisfied(&self) -> bool {
        self.unsatisfied_mandatory.is_empty()
    }

    pub fn has_unsatisfied_optionals(&self) -> bool {
        !self.unsatisfied_optional.is_empty()
    }

    /// Validate the name and apply the deprecation policy.
    ///
    /// An invalid name is always an error. Deprecation notices are dropped,
    /// turned into a warning, or turned into [`GroveError::DeprecatedFormat`]
    /// depending on `handling`.
    pub fn finalize(&self, handling: DeprecatedHandling) -> GroveResult<Option<Diagnostic>> {
        if !is_valid_name(&self.name) {
            return Err(GroveError::InvalidName {
                name: self.name.clone(),
                path: self.location.to_string(),
            });
        }

        if self.deprecation_notices.is_empty() {
            return Ok(None);
        }

        match handling {
            DeprecatedHandling::Ignore => Ok(None),
            DeprecatedHandling::Log => {
                let mut message = format!("Package {} at {}:", self.name, self.location);
                for notice in &self.deprecation_notices {
                    message.push_str("\n\t");
                    message.push_str(notice);
                }
                Ok(Some(Diagnostic::warning(message)))
            },
            DeprecatedHandling::Error => Err(GroveError::DeprecatedFormat {
                name: self.name.clone(),
                path: self.location.to_string(),
                notices: self.deprecation_notices.clone(),
            }),
        }
    }
}
