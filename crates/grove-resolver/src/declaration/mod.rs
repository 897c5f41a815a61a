//! Package declaration parsing.
//!
//! A package directory is described by `mod.conf`. Older packages use
//! `depends.txt` and `description.txt` instead; those are still read, and
//! every legacy source actually used leaves a deprecation notice on the
//! spec. A directory holding `modpack.txt` or `modpack.conf` is a group and
//! its members are discovered from the same directory.

use crate::discovery::discover_nested;
use crate::ResolverResult;
use camino::Utf8Path;
use grove_config::KvFile;
use grove_core::error::GroveError;
use grove_core::types::PackageSpec;
use grove_core::utils::strip_modifiers;
use std::io::ErrorKind;
use tracing::{debug, warn};

/// Primary declaration file
pub const DECLARATION_FILE: &str = "mod.conf";

/// Group markers, legacy name first
pub const GROUP_MARKERS: [&str; 2] = ["modpack.txt", "modpack.conf"];

/// Legacy line-oriented dependency list
pub const LEGACY_DEPENDS_FILE: &str = "depends.txt";

/// Legacy plain-text description
pub const LEGACY_DESCRIPTION_FILE: &str = "description.txt";

pub const NOTICE_MISSING_NAME: &str =
    "Mods not having a mod.conf file with the name is deprecated.";
pub const NOTICE_LEGACY_DEPENDS: &str = "depends.txt is deprecated, please use mod.conf instead.";
pub const NOTICE_LEGACY_DESCRIPTION: &str =
    "description.txt is deprecated, please use mod.conf instead.";

/// Fill `spec` from the declaration files in `spec.location`.
///
/// `depth` is the group nesting level of `spec` and is passed on when a
/// group's members are discovered. The name is not validated here.
pub fn parse_declaration(spec: &mut PackageSpec, depth: usize) -> ResolverResult<()> {
    spec.mandatory_deps.clear();
    spec.optional_deps.clear();
    spec.is_group = false;
    spec.group_members.clear();

    if is_group_dir(&spec.location) {
        debug!("{} is a package group", spec.location);
        spec.is_group = true;
        spec.group_members = discover_nested(&spec.location, true, depth + 1)?;
        return Ok(());
    }

    let info = KvFile::read(&spec.location.join(DECLARATION_FILE))?;

    match info.get("name") {
        Some(name) => spec.name = name.to_string(),
        None => spec.deprecation_notices.push(NOTICE_MISSING_NAME.to_string()),
    }

    if let Some(author) = info.get("author") {
        spec.author = Some(author.to_string());
    }

    if let Some(release) = info.get("release") {
        match release.trim().parse::<i32>() {
            Ok(value) => spec.release = value,
            Err(_) => warn!("Package at {} has a non-numeric release '{}'", spec.location, release),
        }
    }

    let mut declared_depends = false;
    if let Some(depends) = info.get("depends") {
        declared_depends = true;
        spec.mandatory_deps.extend(split_dependency_list(depends));
    }
    if let Some(optional) = info.get("optional_depends") {
        declared_depends = true;
        spec.optional_deps.extend(split_dependency_list(optional));
    }

    if !declared_depends {
        if let Some(content) = read_optional(&spec.location.join(LEGACY_DEPENDS_FILE))? {
            spec.deprecation_notices.push(NOTICE_LEGACY_DEPENDS.to_string());
            parse_legacy_depends(&content, spec);
        }
    }

    if let Some(description) = info.get("description") {
        spec.description = description.to_string();
    } else if let Some(content) = read_optional(&spec.location.join(LEGACY_DESCRIPTION_FILE))? {
        spec.description = content;
        spec.deprecation_notices.push(NOTICE_LEGACY_DESCRIPTION.to_string());
    }

    Ok(())
}

/// Check for either group marker file
pub fn is_group_dir(dir: &Utf8Path) -> bool {
    GROUP_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

/// Split a `depends`-style field: whitespace is ignored, items are comma separated
pub fn split_dependency_list(value: &str) -> Vec<String> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// One dependency per line; a trailing `?` marks it optional
fn parse_legacy_depends(content: &str, spec: &mut PackageSpec) {
    for line in content.lines() {
        let Some((name, symbols)) = strip_modifiers(line) else {
            continue;
        };
        if symbols.contains(&'?') {
            spec.optional_deps.insert(name);
        } else {
            spec.mandatory_deps.insert(name);
        }
    }
}

fn read_optional(path: &Utf8Path) -> ResolverResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(GroveError::io(format!("Failed to read {}", path), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn package_dir(temp: &TempDir, name: &str, files: &[(&str, &str)]) -> Utf8PathBuf {
        let dir = Utf8PathBuf::try_from(temp.path().join(name)).unwrap();
        fs::create_dir_all(&dir).unwrap();
        for (file, content) in files {
            fs::write(dir.join(file), content).unwrap();
        }
        dir
    }

    fn parse(dir: Utf8PathBuf) -> PackageSpec {
        let name = dir.file_name().unwrap().to_string();
        let mut spec = PackageSpec::new(name, dir, false);
        parse_declaration(&mut spec, 0).unwrap();
        spec
    }

    #[test]
    fn test_parse_mod_conf() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "dir_name", &[(
            "mod.conf",
            "name = stairs\nauthor = celeron55\nrelease = 42\ndepends = default, \t wool ,\noptional_depends = doors\ndescription = Stairs and slabs\n",
        )]);

        let spec = parse(dir);
        assert_eq!(spec.name, "stairs");
        assert_eq!(spec.author.as_deref(), Some("celeron55"));
        assert_eq!(spec.release, 42);
        assert_eq!(spec.mandatory_deps.iter().collect::<Vec<_>>(), vec!["default", "wool"]);
        assert_eq!(spec.optional_deps.iter().collect::<Vec<_>>(), vec!["doors"]);
        assert_eq!(spec.description, "Stairs and slabs");
        assert!(spec.deprecation_notices.is_empty());
        assert!(!spec.is_group);
    }

    #[test]
    fn test_missing_name_uses_directory() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "fallback", &[("mod.conf", "depends = default\n")]);

        let spec = parse(dir);
        assert_eq!(spec.name, "fallback");
        assert_eq!(spec.deprecation_notices, vec![NOTICE_MISSING_NAME.to_string()]);
    }

    #[test]
    fn test_legacy_depends_txt() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "legacy", &[
            ("mod.conf", "name = legacy\n"),
            ("depends.txt", "default\n  doors?  \n\nfarming!\n   \nwool ?\n"),
        ]);

        let spec = parse(dir);
        assert_eq!(spec.mandatory_deps.iter().collect::<Vec<_>>(), vec!["default", "farming"]);
        assert_eq!(spec.optional_deps.iter().collect::<Vec<_>>(), vec!["doors", "wool"]);
        assert_eq!(spec.deprecation_notices, vec![NOTICE_LEGACY_DEPENDS.to_string()]);
    }

    #[test]
    fn test_mod_conf_depends_disable_legacy_file() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "both", &[
            ("mod.conf", "name = both\noptional_depends = doors\n"),
            ("depends.txt", "default\n"),
        ]);

        let spec = parse(dir);
        assert!(spec.mandatory_deps.is_empty());
        assert!(spec.optional_deps.contains("doors"));
        assert!(spec.deprecation_notices.is_empty());
    }

    #[test]
    fn test_legacy_description_txt() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "described", &[
            ("mod.conf", "name = described\ndepends =\n"),
            ("description.txt", "An old package"),
        ]);

        let spec = parse(dir);
        assert_eq!(spec.description, "An old package");
        assert!(spec.mandatory_deps.is_empty());
        assert_eq!(spec.deprecation_notices, vec![NOTICE_LEGACY_DESCRIPTION.to_string()]);
    }

    #[test]
    fn test_bare_directory() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "bare", &[]);

        let spec = parse(dir);
        assert_eq!(spec.name, "bare");
        assert!(spec.description.is_empty());
        assert_eq!(spec.release, 0);
        assert_eq!(spec.deprecation_notices, vec![NOTICE_MISSING_NAME.to_string()]);
    }

    #[test]
    fn test_bad_release_is_ignored() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "rel", &[("mod.conf", "name = rel\nrelease = soon\n")]);
        assert_eq!(parse(dir).release, 0);
    }

    #[test]
    fn test_group_marker_skips_fields() {
        let temp = TempDir::new().unwrap();
        let dir = package_dir(&temp, "pack", &[
            ("modpack.conf", "name = pack\n"),
            ("mod.conf", "name = should_not_be_read\n"),
        ]);
        package_dir(&temp, "pack/member", &[("mod.conf", "name = member\n")]);

        let spec = parse(dir);
        assert!(spec.is_group);
        assert_eq!(spec.name, "pack");
        assert!(spec.deprecation_notices.is_empty());
        let member = spec.group_members.get("member").unwrap();
        assert!(member.part_of_group);
        assert_eq!(member.name, "member");
    }

    #[test]
    fn test_split_dependency_list() {
        assert_eq!(split_dependency_list(" a , b\t,, c "), vec!["a", "b", "c"]);
        assert!(split_dependency_list("").is_empty());
    }
}
