//! Depth-first dependency traversal with cycle reporting
//!
//! The walk runs on an explicit frame stack, so chain length is bounded by
//! memory rather than by the call stack. Every name is expanded at most once;
//! a name is marked seen before its dependencies are visited. A missing name
//! reached only through optional dependencies is never marked seen.

use grove_core::types::PackageSpec;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A back-edge found during traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircularDependency {
    /// Name that was reached while already on the chain
    pub name: String,
    /// Resolution chain at the moment the back-edge was found, outermost first
    pub chain: Vec<String>,
}

impl fmt::Display for CircularDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.chain {
            write!(f, "{} -> ", name)?;
        }
        write!(f, "{}", self.name)
    }
}

/// Everything a finished walk learned about the graph
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Existing packages in post-order
    pub resolved: Vec<String>,
    /// Every package visited, plus missing names some package requires
    pub seen: HashSet<String>,
    pub cycles: Vec<CircularDependency>,
}

/// One package being expanded
#[derive(Debug)]
struct Frame<'a> {
    name: &'a str,
    spec: &'a PackageSpec,
    /// Next dependency to visit, mandatory ones first
    next: usize,
}

/// Traversal state over a name-indexed package map
#[derive(Debug)]
pub struct DependencyWalk<'a> {
    packages: &'a BTreeMap<String, PackageSpec>,
    chain: IndexSet<&'a str>,
    frames: Vec<Frame<'a>>,
    seen: HashSet<&'a str>,
    resolved: Vec<String>,
    cycles: Vec<CircularDependency>,
}

impl<'a> DependencyWalk<'a> {
    /// Create a walk with nothing visited yet
    pub fn new(packages: &'a BTreeMap<String, PackageSpec>) -> Self {
        Self {
            packages,
            chain: IndexSet::new(),
            frames: Vec::new(),
            seen: HashSet::with_capacity(packages.len()),
            resolved: Vec::with_capacity(packages.len()),
            cycles: Vec::new(),
        }
    }

    /// Visit every package in map order and collect the outcome
    pub fn run(packages: &'a BTreeMap<String, PackageSpec>) -> WalkOutcome {
        let mut walk = Self::new(packages);
        for name in packages.keys() {
            walk.visit(name);
        }
        walk.finish()
    }

    /// Visit `name` and everything reachable from it that was not seen before
    pub fn visit(&mut self, name: &'a str) {
        self.enter(name, false);

        while let Some(frame) = self.frames.last_mut() {
            let spec = frame.spec;
            let index = frame.next;
            frame.next += 1;

            if let Some((dependency, optional)) = dependency_at(spec, index) {
                self.enter(dependency, optional);
                continue;
            }

            if let Some(done) = self.frames.pop() {
                self.chain.pop();
                self.resolved.push(done.name.to_string());
            }
        }
    }

    fn enter(&mut self, name: &'a str, optional: bool) {
        if self.chain.contains(name) {
            self.cycles.push(CircularDependency {
                name: name.to_string(),
                chain: self.chain.iter().map(|n| n.to_string()).collect(),
            });
            return;
        }

        let packages = self.packages;
        let spec = packages.get(name);
        if spec.is_none() && optional {
            return;
        }

        if !self.seen.insert(name) {
            return;
        }

        // Missing names have nothing to expand
        if let Some(spec) = spec {
            self.chain.insert(name);
            self.frames.push(Frame { name, spec, next: 0 });
        }
    }

    pub fn is_seen(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn cycles(&self) -> &[CircularDependency] {
        &self.cycles
    }

    /// Consume the walk
    pub fn finish(self) -> WalkOutcome {
        WalkOutcome {
            resolved: self.resolved,
            seen: self.seen.into_iter().map(str::to_string).collect(),
            cycles: self.cycles,
        }
    }
}

/// Dependency number `index` and whether it is optional
fn dependency_at(spec: &PackageSpec, index: usize) -> Option<(&str, bool)> {
    let mandatory = spec.mandatory_deps.len();
    if index < mandatory {
        spec.mandatory_deps.get_index(index).map(|name| (name.as_str(), false))
    } else {
        spec.optional_deps
            .get_index(index - mandatory)
            .map(|name| (name.as_str(), true))
    }
}
