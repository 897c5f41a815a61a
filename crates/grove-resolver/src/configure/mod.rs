//! Configuration orchestration.
//!
//! Builtin roots are always loaded. Addon roots are filtered through a
//! settings file of `load_<name> = true|false` entries; every discovered
//! package without an entry is recorded as disabled so the file lists all
//! known packages after a run. The merged set is checked for conflicts and
//! resolved, and every non-fatal finding is returned as a [`Diagnostic`].

use crate::discovery::packages_in_path;
use crate::order::{quoted, ResolutionResult, Resolver};
use crate::overlay::PackageSet;
use crate::ResolverResult;
use camino::{Utf8Path, Utf8PathBuf};
use grove_config::{GroveToml, KvFile};
use grove_core::error::GroveError;
use grove_core::types::{DeprecatedHandling, Diagnostic, PackageSpec, Severity};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, error, info, warn};

#[cfg(test)]
mod tests;

/// Prefix of enable/disable keys in the settings file
pub const SETTINGS_KEY_PREFIX: &str = "load_";

/// Values that disable a package
const DISABLED_VALUES: [&str; 2] = ["false", "nil"];

/// Everything [`configure`] needs to know
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureOptions {
    /// Always loaded, lowest precedence first
    pub builtin_roots: Vec<Utf8PathBuf>,
    /// Filtered by the settings file, lowest precedence first
    pub search_roots: Vec<Utf8PathBuf>,
    pub settings_path: Utf8PathBuf,
    pub deprecated: DeprecatedHandling,
}

impl ConfigureOptions {
    pub fn new(search_roots: Vec<Utf8PathBuf>, settings_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            builtin_roots: Vec::new(),
            search_roots,
            settings_path: settings_path.into(),
            deprecated: DeprecatedHandling::default(),
        }
    }

    pub fn with_builtin_roots(mut self, roots: Vec<Utf8PathBuf>) -> Self {
        self.builtin_roots = roots;
        self
    }

    pub fn with_deprecated(mut self, handling: DeprecatedHandling) -> Self {
        self.deprecated = handling;
        self
    }

    /// Options described by a loaded grove.toml
    pub fn from_config(config: &GroveToml) -> Self {
        Self {
            builtin_roots: config.paths.builtin.clone(),
            search_roots: config.paths.addons.clone(),
            settings_path: config.settings_path(),
            deprecated: config.deprecated_handling(),
        }
    }
}

/// Incremental configuration builder
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    set: PackageSet,
    deprecated: DeprecatedHandling,
    diagnostics: Vec<Diagnostic>,
    /// Requested in the settings file but not discovered
    not_found: BTreeSet<String>,
}

impl Configuration {
    pub fn new(deprecated: DeprecatedHandling) -> Self {
        Self {
            deprecated,
            ..Self::default()
        }
    }

    /// Load every package under `root` as one precedence level
    pub fn add_packages_in_path(&mut self, root: &Utf8Path) -> ResolverResult<()> {
        debug!("Adding all packages in {}", root);
        let packages = self.finalize_all(packages_in_path(root)?)?;
        self.set.add_packages(packages);
        Ok(())
    }

    /// Load the packages the settings file enables from all `roots` as a
    /// single precedence level.
    ///
    /// The same name enabled in two roots is a conflict. Discovered packages
    /// with no enabling entry are written back as disabled before anything
    /// is merged.
    pub fn add_packages_from_settings(
        &mut self,
        settings_path: &Utf8Path,
        roots: &[Utf8PathBuf],
    ) -> ResolverResult<()> {
        let mut settings = KvFile::read(settings_path)?;
        let requested = requested_names(&settings);
        debug!("{} packages requested in {}", requested.len(), settings_path);

        let mut discovered = HashSet::new();
        let mut kept = Vec::new();
        for root in roots {
            for spec in packages_in_path(root)? {
                discovered.insert(spec.name.clone());
                if requested.contains(&spec.name) {
                    kept.push(spec);
                } else {
                    settings.set_bool(format!("{}{}", SETTINGS_KEY_PREFIX, spec.name), false);
                }
            }
        }

        settings.update_file(settings_path)?;

        let kept = self.finalize_all(kept)?;
        self.set.add_packages(kept);

        self.not_found
            .extend(requested.into_iter().filter(|name| !discovered.contains(name)));
        Ok(())
    }

    /// Apply the deprecation policy; packages refused by it are dropped
    fn finalize_all(&mut self, specs: Vec<PackageSpec>) -> ResolverResult<Vec<PackageSpec>> {
        let mut kept = Vec::with_capacity(specs.len());
        for spec in specs {
            match spec.finalize(self.deprecated) {
                Ok(None) => kept.push(spec),
                Ok(Some(diagnostic)) => {
                    self.diagnostics.push(diagnostic);
                    kept.push(spec);
                },
                Err(e @ GroveError::DeprecatedFormat { .. }) => {
                    warn!("Not loading {}: deprecated declarations", spec.name);
                    self.diagnostics.push(Diagnostic::error(e.to_string()));
                },
                Err(e) => return Err(e),
            }
        }
        Ok(kept)
    }

    pub fn package_set(&self) -> &PackageSet {
        &self.set
    }

    pub fn not_found(&self) -> &BTreeSet<String> {
        &self.not_found
    }

    /// Check conflicts and resolve the merged set
    pub fn resolve(self) -> ResolverResult<Configured> {
        self.set.check_conflicts()?;

        let mut diagnostics = self.diagnostics;
        diagnostics.extend(self.set.diagnostics().iter().cloned());

        let not_found: Vec<&String> = self
            .not_found
            .iter()
            .filter(|name| !self.set.contains(name))
            .collect();
        let not_found_report = (!not_found.is_empty()).then(|| {
            Diagnostic::error(format!(
                "The following packages could not be found: {}",
                quoted(not_found.into_iter())
            ))
        });

        let result = Resolver::new(self.set.into_packages()).run();
        diagnostics.extend(result.diagnostics());
        diagnostics.extend(not_found_report);

        info!(
            "Load order has {} packages, {} diagnostics",
            result.sorted().len(),
            diagnostics.len()
        );
        Ok(Configured { result, diagnostics })
    }
}

/// Whether `settings` enables the package called `name`
pub fn is_enabled(settings: &KvFile, name: &str) -> bool {
    settings
        .get(&format!("{}{}", SETTINGS_KEY_PREFIX, name))
        .is_some_and(|value| !DISABLED_VALUES.contains(&value))
}

fn requested_names(settings: &KvFile) -> BTreeSet<String> {
    settings
        .iter()
        .filter(|(_, value)| !DISABLED_VALUES.contains(value))
        .filter_map(|(key, _)| key.strip_prefix(SETTINGS_KEY_PREFIX))
        .map(str::to_string)
        .collect()
}

/// A finished configuration
#[derive(Debug, Clone, Serialize)]
pub struct Configured {
    result: ResolutionResult,
    diagnostics: Vec<Diagnostic>,
}

impl Configured {
    pub fn result(&self) -> &ResolutionResult {
        &self.result
    }

    /// Non-fatal findings in the order they were made
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_result(self) -> ResolutionResult {
        self.result
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Emit every diagnostic through `tracing`
    pub fn log(&self) {
        for diagnostic in &self.diagnostics {
            match diagnostic.severity {
                Severity::Error => error!("{}", diagnostic.message),
                Severity::Warning => warn!("{}", diagnostic.message),
                Severity::Info => info!("{}", diagnostic.message),
            }
        }
    }
}

/// Run the whole flow: builtin roots, settings-filtered roots, resolution
pub fn configure(options: &ConfigureOptions) -> ResolverResult<Configured> {
    info!(
        "Configuring {} builtin and {} addon roots",
        options.builtin_roots.len(),
        options.search_roots.len()
    );

    let mut configuration = Configuration::new(options.deprecated);
    for root in &options.builtin_roots {
        configuration.add_packages_in_path(root)?;
    }
    configuration.add_packages_from_settings(&options.settings_path, &options.search_roots)?;
    configuration.resolve()
}
