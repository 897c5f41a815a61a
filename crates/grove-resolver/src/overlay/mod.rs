//! Merging packages from several search roots.
//!
//! Roots are merged one call at a time, lowest precedence first. A package
//! from a later call overrides an earlier one of the same name. Two packages
//! of the same name arriving in the same call are a conflict, and the name
//! stays marked until some later call overrides it.

use crate::order::{ResolutionResult, Resolver};
use crate::ResolverResult;
use grove_core::error::GroveError;
use grove_core::types::{Diagnostic, PackageSpec};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Working set of packages with override and conflict tracking
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    /// Packages in first-insertion order
    packages: Vec<PackageSpec>,
    /// Name to position in `packages`
    index: HashMap<String, usize>,
    /// Names with an unresolved same-level conflict
    conflicts: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl PackageSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one precedence level.
    ///
    /// Group members are placed before loose packages, so a loose package
    /// overrides a group member of the same name from the same level.
    pub fn add_packages(&mut self, incoming: Vec<PackageSpec>) {
        let (members, loose): (Vec<_>, Vec<_>) = incoming.into_iter().partition(|spec| spec.part_of_group);

        for pass in [members, loose] {
            let mut seen_this_pass = HashSet::new();
            for spec in pass {
                self.place(spec, &mut seen_this_pass);
            }
        }
    }

    fn place(&mut self, spec: PackageSpec, seen_this_pass: &mut HashSet<String>) {
        let name = spec.name.clone();

        let Some(&position) = self.index.get(&name) else {
            debug!("Adding package {} from {}", name, spec.location);
            self.index.insert(name.clone(), self.packages.len());
            self.packages.push(spec);
            seen_this_pass.insert(name);
            return;
        };

        let previous = std::mem::replace(&mut self.packages[position], spec);
        let current = &self.packages[position];

        if seen_this_pass.insert(name.clone()) {
            let message = format!(
                "Package name conflict detected: \"{}\"\nWill not load: {}\nOverridden by: {}",
                name, previous.location, current.location
            );
            warn!("{}", message);
            self.diagnostics.push(Diagnostic::warning(message));
            self.conflicts.remove(&name);
        } else {
            let message = format!(
                "Package name conflict detected: \"{}\"\nWill not load: {}\nWill not load: {}",
                name, previous.location, current.location
            );
            warn!("{}", message);
            self.diagnostics.push(Diagnostic::warning(message));
            self.conflicts.insert(name);
        }
    }

    pub fn packages(&self) -> &[PackageSpec] {
        &self.packages
    }

    pub fn into_packages(self) -> Vec<PackageSpec> {
        self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PackageSpec> {
        self.index.get(name).map(|&position| &self.packages[position])
    }

    /// Names currently marked as conflicted
    pub fn conflicts(&self) -> &BTreeSet<String> {
        &self.conflicts
    }

    /// Override and conflict reports collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Fail if any conflict mark is left
    pub fn check_conflicts(&self) -> ResolverResult<()> {
        if self.conflicts.is_empty() {
            Ok(())
        } else {
            Err(GroveError::name_conflict(self.conflicts.iter()))
        }
    }

    /// Resolve the current working set, conflicts included
    pub fn resolve(&self) -> ResolutionResult {
        Resolver::new(self.packages.clone())
            .run()
            .with_name_conflicts(self.conflicts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose(name: &str, path: &str) -> PackageSpec {
        PackageSpec::new(name, path, false)
    }

    fn member(name: &str, path: &str) -> PackageSpec {
        PackageSpec::new(name, path, true)
    }

    fn locations(set: &PackageSet) -> Vec<(&str, &str)> {
        set.packages()
            .iter()
            .map(|s| (s.name.as_str(), s.location.as_str()))
            .collect()
    }

    #[test]
    fn test_new_names_are_appended() {
        let mut set = PackageSet::new();
        set.add_packages(vec![loose("a", "/r1/a"), loose("b", "/r1/b")]);
        set.add_packages(vec![loose("c", "/r2/c")]);

        assert_eq!(locations(&set), vec![("a", "/r1/a"), ("b", "/r1/b"), ("c", "/r2/c")]);
        assert!(set.conflicts().is_empty());
        assert!(set.diagnostics().is_empty());
        assert!(set.check_conflicts().is_ok());
    }

    #[test]
    fn test_same_call_duplicate_is_conflict() {
        let mut set = PackageSet::new();
        set.add_packages(vec![loose("a", "/r1/x/a"), loose("a", "/r1/y/a")]);

        assert_eq!(locations(&set), vec![("a", "/r1/y/a")]);
        assert!(set.conflicts().contains("a"));
        assert_eq!(set.diagnostics().len(), 1);
        assert!(set.diagnostics()[0].message.contains("Will not load: /r1/y/a"));

        let err = set.check_conflicts().unwrap_err();
        assert!(matches!(err, GroveError::NameConflict { ref names } if names == &["a".to_string()]));
    }

    #[test]
    fn test_later_call_overrides_without_conflict() {
        let mut set = PackageSet::new();
        set.add_packages(vec![loose("a", "/p1/a")]);
        set.add_packages(vec![loose("a", "/p2/a")]);

        assert_eq!(locations(&set), vec![("a", "/p2/a")]);
        assert!(set.conflicts().is_empty());
        assert!(set.diagnostics()[0].message.contains("Overridden by: /p2/a"));
    }

    #[test]
    fn test_override_clears_earlier_conflict() {
        let mut set = PackageSet::new();
        set.add_packages(vec![loose("a", "/r1/x/a"), loose("a", "/r1/y/a")]);
        assert!(!set.conflicts().is_empty());

        set.add_packages(vec![loose("a", "/r2/a")]);
        assert!(set.conflicts().is_empty());
        assert_eq!(set.get("a").unwrap().location, "/r2/a");
    }

    #[test]
    fn test_conflict_persists_across_unrelated_calls() {
        let mut set = PackageSet::new();
        set.add_packages(vec![loose("a", "/r1/x/a"), loose("a", "/r1/y/a")]);
        set.add_packages(vec![loose("b", "/r2/b")]);

        assert!(set.conflicts().contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn test_group_members_are_merged_first() {
        let mut set = PackageSet::new();
        // The loose entry comes first in the input but is placed second
        set.add_packages(vec![loose("a", "/r1/a"), member("a", "/r1/pack/a")]);

        assert_eq!(locations(&set), vec![("a", "/r1/a")]);
        assert!(set.conflicts().is_empty());
        assert!(set.diagnostics()[0].message.contains("Overridden by: /r1/a"));
    }

    #[test]
    fn test_two_members_of_one_level_conflict() {
        let mut set = PackageSet::new();
        set.add_packages(vec![member("a", "/r1/p1/a"), member("a", "/r1/p2/a")]);

        assert!(set.conflicts().contains("a"));
    }

    #[test]
    fn test_member_overrides_earlier_loose_package() {
        let mut set = PackageSet::new();
        set.add_packages(vec![loose("a", "/r1/a")]);
        set.add_packages(vec![member("a", "/r2/pack/a")]);

        assert_eq!(set.get("a").unwrap().location, "/r2/pack/a");
        assert!(set.conflicts().is_empty());
    }

    #[test]
    fn test_conflicts_are_sorted_in_error() {
        let mut set = PackageSet::new();
        set.add_packages(vec![
            loose("zeta", "/1/zeta"),
            loose("alpha", "/1/alpha"),
            loose("zeta", "/2/zeta"),
            loose("alpha", "/2/alpha"),
        ]);

        let err = set.check_conflicts().unwrap_err();
        assert_eq!(err.to_string(), "Unresolved name conflicts for packages \"alpha\", \"zeta\".");
    }

    #[test]
    fn test_resolve_carries_conflicts() {
        let mut set = PackageSet::new();
        set.add_packages(vec![loose("a", "/1/a"), loose("a", "/2/a")]);

        let result = set.resolve();
        assert_eq!(result.name_conflicts().iter().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(result.sorted().len(), 1);
    }
}
