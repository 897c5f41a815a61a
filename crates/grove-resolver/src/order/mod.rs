//! Load-order resolution and failure classification
//!
//! [`Resolver`] walks the dependency graph, strips every resolved name from
//! each package's dependency sets and splits the resolved order into
//! loadable and unsatisfied packages.

use crate::graph::{CircularDependency, DependencyWalk, WalkOutcome};
use grove_core::types::{Diagnostic, PackageSpec};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Outcome of one resolution, read-only once built
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionResult {
    sorted: Vec<PackageSpec>,
    unsatisfied: Vec<PackageSpec>,
    with_unsatisfied_optionals: Vec<PackageSpec>,
    circular: Vec<CircularDependency>,
    name_conflicts: BTreeSet<String>,
}

impl ResolutionResult {
    /// Packages in load order
    pub fn sorted(&self) -> &[PackageSpec] {
        &self.sorted
    }

    /// Packages left out because a mandatory dependency is missing
    pub fn unsatisfied(&self) -> &[PackageSpec] {
        &self.unsatisfied
    }

    /// Loadable packages that miss a known optional dependency
    pub fn with_unsatisfied_optionals(&self) -> &[PackageSpec] {
        &self.with_unsatisfied_optionals
    }

    pub fn circular(&self) -> &[CircularDependency] {
        &self.circular
    }

    pub fn name_conflicts(&self) -> &BTreeSet<String> {
        &self.name_conflicts
    }

    /// Names in load order
    pub fn load_order(&self) -> Vec<&str> {
        self.sorted.iter().map(|spec| spec.name.as_str()).collect()
    }

    /// No unsatisfied packages, optional misses, cycles or conflicts
    pub fn is_clean(&self) -> bool {
        self.unsatisfied.is_empty()
            && self.with_unsatisfied_optionals.is_empty()
            && self.circular.is_empty()
            && self.name_conflicts.is_empty()
    }

    pub(crate) fn with_name_conflicts(mut self, conflicts: BTreeSet<String>) -> Self {
        self.name_conflicts = conflicts;
        self
    }

    /// Render the findings: unsatisfied packages, then optional misses, then cycles
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for spec in &self.unsatisfied {
            diagnostics.push(Diagnostic::error(format!(
                "package \"{}\" has unsatisfied dependencies: {}",
                spec.name,
                quoted(spec.unsatisfied_mandatory.iter())
            )));
        }

        for spec in &self.with_unsatisfied_optionals {
            diagnostics.push(Diagnostic::warning(format!(
                "package \"{}\" has unsatisfied dependencies (optional): {}",
                spec.name,
                quoted(spec.unsatisfied_optional.iter())
            )));
        }

        for cycle in &self.circular {
            diagnostics.push(Diagnostic::warning(format!(
                "circular dependency triggered by \"{}\" check packages in chain; resolution-chain: {}",
                cycle.name,
                quoted(cycle.chain.iter())
            )));
        }

        diagnostics
    }
}

/// `"a" "b" "c"`
pub(crate) fn quoted<'a>(names: impl Iterator<Item = &'a String>) -> String {
    names
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolver over a name-indexed package map
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    packages: BTreeMap<String, PackageSpec>,
}

impl Resolver {
    /// Index `packages` by name; a later duplicate replaces an earlier one
    pub fn new(packages: Vec<PackageSpec>) -> Self {
        let packages = packages
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Walk, compute unsatisfied sets and classify
    pub fn run(self) -> ResolutionResult {
        let WalkOutcome { resolved, seen, cycles } = DependencyWalk::run(&self.packages);
        let mut packages = self.packages;

        mark_unsatisfied(&mut packages, &resolved, &seen);

        let mut result = ResolutionResult {
            circular: cycles,
            ..ResolutionResult::default()
        };

        for name in &resolved {
            let Some(spec) = packages.remove(name) else {
                continue;
            };
            if spec.is_satisfied() {
                if spec.has_unsatisfied_optionals() {
                    result.with_unsatisfied_optionals.push(spec.clone());
                }
                result.sorted.push(spec);
            } else {
                result.unsatisfied.push(spec);
            }
        }

        debug!(
            "Resolved {} packages, {} unsatisfied, {} cycles",
            result.sorted.len(),
            result.unsatisfied.len(),
            result.circular.len()
        );

        result
    }
}

fn mark_unsatisfied(
    packages: &mut BTreeMap<String, PackageSpec>,
    resolved: &[String],
    seen: &HashSet<String>,
) {
    let resolved: HashSet<&str> = resolved.iter().map(String::as_str).collect();

    for spec in packages.values_mut() {
        spec.unsatisfied_mandatory = spec
            .mandatory_deps
            .iter()
            .filter(|name| !resolved.contains(name.as_str()))
            .cloned()
            .collect();
        // Optionals nobody ever mentioned are not reported
        spec.unsatisfied_optional = spec
            .optional_deps
            .iter()
            .filter(|name| seen.contains(name.as_str()) && !resolved.contains(name.as_str()))
            .cloned()
            .collect();
    }
}

/// Resolve a package list in one call
pub fn resolve(packages: Vec<PackageSpec>) -> ResolutionResult {
    Resolver::new(packages).run()
}
