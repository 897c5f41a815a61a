//! Package discovery in search roots.
//!
//! Every immediate subdirectory of a root is a candidate package. Groups
//! are discovered recursively through the declaration parser, and
//! [`flatten`] turns the resulting tree into the list of loadable packages.

use crate::declaration::parse_declaration;
use crate::ResolverResult;
use camino::{Utf8Path, Utf8PathBuf};
use grove_core::error::GroveError;
use grove_core::types::PackageSpec;
use grove_core::utils::is_hidden;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Deepest group nesting accepted before discovery gives up
pub const MAX_GROUP_DEPTH: usize = 32;

/// Discover the packages directly under `root`, keyed by directory name.
///
/// Hidden directories are skipped. A missing root yields an empty map.
pub fn discover(root: &Utf8Path, part_of_group: bool) -> ResolverResult<BTreeMap<String, PackageSpec>> {
    discover_nested(root, part_of_group, 0)
}

pub(crate) fn discover_nested(
    root: &Utf8Path,
    part_of_group: bool,
    depth: usize,
) -> ResolverResult<BTreeMap<String, PackageSpec>> {
    if depth > MAX_GROUP_DEPTH {
        return Err(GroveError::GroupTooDeep {
            path: root.to_string(),
            limit: MAX_GROUP_DEPTH,
        });
    }

    let mut result = BTreeMap::new();
    if !root.is_dir() {
        debug!("Search root {} does not exist", root);
        return Ok(result);
    }

    let entries = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let message = format!("Failed to list {}", root);
                return Err(match e.into_io_error() {
                    Some(source) => GroveError::io(message, source),
                    None => GroveError::io(message, std::io::Error::other("filesystem loop")),
                });
            },
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", root, e);
                continue;
            },
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
            warn!("Skipping non UTF-8 directory name in {}", root);
            continue;
        };

        // .git, .svn and friends
        if is_hidden(&dir_name) {
            continue;
        }

        let location = root.join(&dir_name);
        let mut spec = PackageSpec::new(dir_name.clone(), location, part_of_group);
        parse_declaration(&mut spec, depth)?;
        result.insert(dir_name, spec);
    }

    Ok(result)
}

/// Expand groups into their members; the result holds no groups
pub fn flatten(packages: BTreeMap<String, PackageSpec>) -> Vec<PackageSpec> {
    let mut result = Vec::with_capacity(packages.len());
    for (_, spec) in packages {
        if spec.is_group {
            result.extend(flatten(spec.group_members));
        } else {
            result.push(spec);
        }
    }
    result
}

/// Discover and flatten one search root
pub fn packages_in_path(root: &Utf8Path) -> ResolverResult<Vec<PackageSpec>> {
    Ok(flatten(discover(root, false)?))
}

/// Discover and flatten several roots, keeping each root's packages apart
pub fn packages_in_paths(roots: &[Utf8PathBuf]) -> ResolverResult<Vec<Vec<PackageSpec>>> {
    roots.iter().map(|root| packages_in_path(root)).collect()
}
