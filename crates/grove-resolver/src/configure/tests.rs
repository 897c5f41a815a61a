use super::*;
use std::fs;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        Self { _temp: temp, root }
    }

    fn package(&self, rel: &str, conf: &str) -> &Self {
        let dir = self.root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("mod.conf"), conf).unwrap();
        self
    }

    fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn path(&self, rel: &str) -> Utf8PathBuf {
        self.root.join(rel)
    }

    fn settings(&self) -> String {
        fs::read_to_string(self.path("world.mt")).unwrap()
    }

    fn options(&self, roots: &[&str]) -> ConfigureOptions {
        ConfigureOptions::new(roots.iter().map(|r| self.path(r)).collect(), self.path("world.mt"))
    }
}

fn messages(configured: &Configured) -> Vec<&str> {
    configured.diagnostics().iter().map(|d| d.message.as_str()).collect()
}

#[test]
fn test_requested_packages_are_loaded_in_order() {
    let fx = Fixture::new();
    fx.package("mods/stairs", "name = stairs\ndepends = default\n")
        .package("mods/default", "name = default\n")
        .file("world.mt", "load_stairs = true\nload_default = true\n");

    let configured = configure(&fx.options(&["mods"])).unwrap();

    assert_eq!(configured.result().load_order(), vec!["default", "stairs"]);
    assert!(configured.diagnostics().is_empty());
    assert!(!configured.has_errors());
}

#[test]
fn test_unrequested_packages_are_written_back_disabled() {
    let fx = Fixture::new();
    fx.package("mods/enabled", "name = enabled\n")
        .package("mods/extra", "name = extra\n")
        .package("mods/off", "name = off\n")
        .file("world.mt", "# world settings\nbackend = sqlite3\nload_enabled = true\nload_off = nil\n");

    let configured = configure(&fx.options(&["mods"])).unwrap();

    assert_eq!(configured.result().load_order(), vec!["enabled"]);
    assert_eq!(
        fx.settings(),
        "# world settings\nbackend = sqlite3\nload_enabled = true\nload_off = false\nload_extra = false\n"
    );
}

#[test]
fn test_missing_settings_file_is_created() {
    let fx = Fixture::new();
    fx.package("mods/solo", "name = solo\n");

    let configured = configure(&fx.options(&["mods"])).unwrap();

    assert!(configured.result().sorted().is_empty());
    assert_eq!(fx.settings(), "load_solo = false\n");
}

#[test]
fn test_requested_but_missing_is_reported() {
    let fx = Fixture::new();
    fx.package("mods/present", "name = present\n")
        .file("world.mt", "load_present = true\nload_zeta = true\nload_alpha = yes\n");

    let configured = configure(&fx.options(&["mods"])).unwrap();

    assert!(configured.has_errors());
    assert_eq!(
        messages(&configured),
        vec!["The following packages could not be found: \"alpha\" \"zeta\""]
    );
}

#[test]
fn test_builtin_roots_are_always_loaded() {
    let fx = Fixture::new();
    fx.package("game/core", "name = core\n")
        .package("mods/addon", "name = addon\ndepends = core\n")
        .file("world.mt", "load_addon = true\nload_core = true\n");

    let options = fx.options(&["mods"]).with_builtin_roots(vec![fx.path("game")]);
    let configured = configure(&options).unwrap();

    assert_eq!(configured.result().load_order(), vec!["core", "addon"]);
    // core is loaded from the builtin root, so it is not "missing"
    assert!(configured.diagnostics().is_empty());
    assert!(!fx.settings().contains("load_core = false"));
}

#[test]
fn test_same_name_in_two_addon_roots_is_fatal() {
    let fx = Fixture::new();
    fx.package("low/shared", "name = shared\n")
        .package("high/shared", "name = shared\n")
        .file("world.mt", "load_shared = true\n");

    let err = configure(&fx.options(&["low", "high"])).unwrap_err();
    assert!(matches!(err, GroveError::NameConflict { ref names } if names == &["shared".to_string()]));
}

#[test]
fn test_addon_roots_share_one_level() {
    let fx = Fixture::new();
    fx.package("low/left", "name = left\n")
        .package("high/right", "name = right\ndepends = left\n")
        .file("world.mt", "load_left = true\nload_right = true\n");

    let configured = configure(&fx.options(&["low", "high"])).unwrap();
    assert_eq!(configured.result().load_order(), vec!["left", "right"]);
    assert!(configured.diagnostics().is_empty());
}

#[test]
fn test_same_root_conflict_is_fatal() {
    let fx = Fixture::new();
    fx.package("mods/one", "name = twin\n")
        .package("mods/two", "name = twin\n")
        .file("world.mt", "load_twin = true\n");

    let err = configure(&fx.options(&["mods"])).unwrap_err();

    assert!(matches!(err, GroveError::NameConflict { ref names } if names == &["twin".to_string()]));
    // The settings file is persisted before the conflict check
    assert_eq!(fx.settings(), "load_twin = true\n");
}

#[test]
fn test_addon_overrides_builtin() {
    let fx = Fixture::new();
    fx.package("game/shared", "name = shared\n")
        .package("mods/shared", "name = shared\n")
        .file("world.mt", "load_shared = true\n");

    let options = fx.options(&["mods"]).with_builtin_roots(vec![fx.path("game")]);
    let configured = configure(&options).unwrap();

    let sorted = configured.result().sorted();
    assert_eq!(sorted.len(), 1);
    assert_eq!(sorted[0].location, fx.path("mods/shared"));
    assert!(messages(&configured)[0].contains("Overridden by:"));
}

#[test]
fn test_builtin_conflict_is_overridden_by_addon() {
    let fx = Fixture::new();
    fx.package("game/one", "name = twin\n")
        .package("game/two", "name = twin\n")
        .package("mods/twin", "name = twin\n")
        .file("world.mt", "load_twin = true\n");

    let options = fx.options(&["mods"]).with_builtin_roots(vec![fx.path("game")]);
    let configured = configure(&options).unwrap();
    assert_eq!(configured.result().sorted()[0].location, fx.path("mods/twin"));
}

#[test]
fn test_invalid_name_is_fatal_when_requested() {
    let fx = Fixture::new();
    fx.package("mods/bad", "name = Bad-Name\n")
        .file("world.mt", "load_Bad-Name = true\n");

    let err = configure(&fx.options(&["mods"])).unwrap_err();
    assert!(matches!(err, GroveError::InvalidName { ref name, .. } if name == "Bad-Name"));
}

#[test]
fn test_invalid_name_is_ignored_when_disabled() {
    let fx = Fixture::new();
    fx.package("mods/bad", "name = Bad-Name\n");

    let configured = configure(&fx.options(&["mods"])).unwrap();
    assert!(configured.result().sorted().is_empty());
    assert_eq!(fx.settings(), "load_Bad-Name = false\n");
}

#[test]
fn test_deprecated_declarations_are_logged() {
    let fx = Fixture::new();
    fx.file("mods/legacy/depends.txt", "")
        .file("world.mt", "load_legacy = true\n");

    let configured = configure(&fx.options(&["mods"])).unwrap();

    assert_eq!(configured.result().load_order(), vec!["legacy"]);
    assert_eq!(configured.diagnostics().len(), 1);
    assert_eq!(configured.diagnostics()[0].severity, Severity::Warning);
    assert!(configured.diagnostics()[0].message.contains("depends.txt is deprecated"));
}

#[test]
fn test_deprecated_declarations_can_be_ignored() {
    let fx = Fixture::new();
    fx.file("mods/legacy/depends.txt", "")
        .file("world.mt", "load_legacy = true\n");

    let options = fx.options(&["mods"]).with_deprecated(DeprecatedHandling::Ignore);
    let configured = configure(&options).unwrap();

    assert_eq!(configured.result().load_order(), vec!["legacy"]);
    assert!(configured.diagnostics().is_empty());
}

#[test]
fn test_deprecated_declarations_can_refuse_package() {
    let fx = Fixture::new();
    fx.file("mods/legacy/depends.txt", "")
        .package("mods/user", "name = user\ndepends = legacy\n")
        .file("world.mt", "load_legacy = true\nload_user = true\n");

    let options = fx.options(&["mods"]).with_deprecated(DeprecatedHandling::Error);
    let configured = configure(&options).unwrap();

    assert!(configured.result().sorted().is_empty());
    assert_eq!(configured.result().unsatisfied()[0].name, "user");

    let errors: Vec<&Diagnostic> = configured.diagnostics().iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].message.starts_with("Package legacy at"));
    assert_eq!(errors[1].message, "package \"user\" has unsatisfied dependencies: \"legacy\"");
}

#[test]
fn test_group_members_are_loaded() {
    let fx = Fixture::new();
    fx.file("mods/pack/modpack.conf", "name = pack\n")
        .package("mods/pack/left", "name = left\n")
        .package("mods/pack/right", "name = right\ndepends = left\n")
        .file("world.mt", "load_left = true\nload_right = true\n");

    let configured = configure(&fx.options(&["mods"])).unwrap();
    assert_eq!(configured.result().load_order(), vec!["left", "right"]);
}

#[test]
fn test_configuration_builder() {
    let fx = Fixture::new();
    fx.package("game/base", "name = base\n")
        .package("mods/extra", "name = extra\n")
        .file("world.mt", "load_extra = true\nload_gone = true\n");

    let mut configuration = Configuration::new(DeprecatedHandling::Log);
    configuration.add_packages_in_path(&fx.path("game")).unwrap();
    configuration
        .add_packages_from_settings(&fx.path("world.mt"), &[fx.path("mods")])
        .unwrap();

    assert_eq!(configuration.package_set().len(), 2);
    assert!(configuration.not_found().contains("gone"));

    let configured = configuration.resolve().unwrap();
    assert_eq!(configured.result().load_order(), vec!["base", "extra"]);
    configured.log();
}

#[test]
fn test_options_from_config() {
    let mut config = GroveToml::with_defaults();
    config.paths.builtin.push(Utf8PathBuf::from("/game/mods"));
    config.diagnostics.deprecated = Some(DeprecatedHandling::Error);
    config.resolve_paths(Utf8Path::new("/world"));

    let options = ConfigureOptions::from_config(&config);
    assert_eq!(options.builtin_roots, vec![Utf8PathBuf::from("/game/mods")]);
    assert_eq!(options.search_roots, vec![Utf8PathBuf::from("/world/mods")]);
    assert_eq!(options.settings_path, Utf8PathBuf::from("/world/mods.conf"));
    assert_eq!(options.deprecated, DeprecatedHandling::Error);
}

#[test]
fn test_is_enabled() {
    let settings = KvFile::parse("load_a = true\nload_b = false\nload_c = nil\nload_d = 1\n");
    assert!(is_enabled(&settings, "a"));
    assert!(!is_enabled(&settings, "b"));
    assert!(!is_enabled(&settings, "c"));
    assert!(is_enabled(&settings, "d"));
    assert!(!is_enabled(&settings, "e"));
}
