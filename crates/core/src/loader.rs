//! Package loading façade.
//!
//! [`PackageLoader`] ties the pieces together: it resolves a package name
//! to physical locations ([`locate`](crate::locate)), enumerates the class
//! entries each location provides ([`scan`](crate::scan)), and
//! materializes every entry through the resolver owning its location,
//! applying the caller's [`InitPolicy`] and isolating per-entry failures.

use crate::error::{LoaderError, Result};
use crate::locate;
use crate::name::PackageName;
use crate::scan;
use crate::scope::LoadingScope;
use packscan_plugin::{BoxError, LoadedUnit, Resolver, UnitHandle};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, info, warn};

/// Initialization policy applied to each materialized entry.
pub enum InitPolicy {
    /// Initialize every entry.
    Eager,
    /// Load entries without running their initialization.
    Lazy,
    /// Load each entry uninitialized, then re-materialize it in
    /// initializing mode only when the predicate approves. Decisions are
    /// independent per entry.
    When(Box<dyn Fn(&dyn LoadedUnit) -> bool + Send + Sync>),
}

impl fmt::Debug for InitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitPolicy::Eager => f.write_str("Eager"),
            InitPolicy::Lazy => f.write_str("Lazy"),
            InitPolicy::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Options for a single [`PackageLoader::load_package`] call.
#[derive(Debug)]
pub struct LoadOptions {
    /// Descend into sub-packages. Defaults to true.
    pub recursive: bool,
    /// Initialization policy. Defaults to [`InitPolicy::Eager`].
    pub init: InitPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            init: InitPolicy::Eager,
        }
    }
}

impl LoadOptions {
    pub fn eager() -> Self {
        Self::default()
    }

    pub fn lazy() -> Self {
        Self {
            recursive: true,
            init: InitPolicy::Lazy,
        }
    }

    pub fn when(predicate: impl Fn(&dyn LoadedUnit) -> bool + Send + Sync + 'static) -> Self {
        Self {
            recursive: true,
            init: InitPolicy::When(Box::new(predicate)),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// The successfully materialized units of one `load_package` call.
///
/// Keyed by entry name; contains no duplicates even when several physical
/// locations redundantly provide the same entry.
#[derive(Default)]
pub struct LoadedPackage {
    units: HashMap<String, UnitHandle>,
}

impl LoadedPackage {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, entry_name: &str) -> bool {
        self.units.contains_key(entry_name)
    }

    pub fn get(&self, entry_name: &str) -> Option<&UnitHandle> {
        self.units.get(entry_name)
    }

    /// Entry names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.units.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitHandle> {
        self.units.values()
    }

    fn insert(&mut self, entry_name: String, unit: UnitHandle) {
        self.units.insert(entry_name, unit);
    }
}

impl fmt::Debug for LoadedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPackage")
            .field("units", &self.names())
            .finish()
    }
}

/// Façade resolving a package name to materialized units across one scope.
///
/// Stateless apart from its immutable scope; any number of threads may
/// call [`load_package`](PackageLoader::load_package) concurrently on the
/// same instance.
pub struct PackageLoader {
    scope: LoadingScope,
}

impl PackageLoader {
    pub fn new(scope: LoadingScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &LoadingScope {
        &self.scope
    }

    /// Load every class entry of package `name` visible in this loader's
    /// scope.
    ///
    /// Fails only for an empty name ([`LoaderError::InvalidArgument`]) or
    /// when no resolver provides any physical location
    /// ([`LoaderError::PackageNotFound`]). Unreadable locations and
    /// per-entry materialization failures degrade to log lines: a package
    /// with at least one location always yields a result, possibly empty.
    pub fn load_package(&self, name: &str, options: &LoadOptions) -> Result<LoadedPackage> {
        let package = PackageName::parse(name)?;
        let logical_path = package.logical_path();

        let locations = locate::locate(&logical_path, &self.scope)?;
        if locations.is_empty() {
            return Err(LoaderError::PackageNotFound(package.as_str().to_string()));
        }
        debug!(
            "Resolved {} locations for package {}",
            locations.len(),
            package
        );

        let mut result = LoadedPackage::default();
        // Names whose most recent attempt failed; a later location
        // providing the same name gets another try.
        let mut failed: HashSet<String> = HashSet::new();

        for location in &locations {
            let entries =
                match scan::enumerate(&location.kind, package.as_str(), options.recursive) {
                    Ok(entries) => entries,
                    Err(err) => {
                        warn!(
                            "Skipping unreadable location {}: {}",
                            location.identity(),
                            err
                        );
                        continue;
                    }
                };

            for entry_name in entries {
                if result.contains(&entry_name) {
                    continue;
                }
                match materialize(location.resolver.as_ref(), &entry_name, &options.init) {
                    Ok(unit) => {
                        failed.remove(&entry_name);
                        result.insert(entry_name, unit);
                    }
                    Err(err) => {
                        warn!(
                            "Failed to materialize {} via {}: {}",
                            entry_name,
                            location.resolver.name(),
                            err
                        );
                        failed.insert(entry_name);
                    }
                }
            }
        }

        info!(
            "Package {} load complete: {} loaded, {} failed",
            package,
            result.len(),
            failed.len()
        );
        Ok(result)
    }
}

fn materialize(
    resolver: &dyn Resolver,
    entry_name: &str,
    init: &InitPolicy,
) -> std::result::Result<UnitHandle, BoxError> {
    match init {
        InitPolicy::Eager => resolver.activate(entry_name),
        InitPolicy::Lazy => resolver.resolve(entry_name),
        InitPolicy::When(predicate) => {
            let unit = resolver.resolve(entry_name)?;
            if predicate(unit.as_ref()) {
                resolver.activate(entry_name)
            } else {
                Ok(unit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packscan_plugin::LocationKind;
    use std::any::Any;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    struct StubUnit {
        name: String,
        initialized: AtomicBool,
    }

    impl StubUnit {
        fn new(name: &str, initialized: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                initialized: AtomicBool::new(initialized),
            })
        }
    }

    impl LoadedUnit for StubUnit {
        fn name(&self) -> &str {
            &self.name
        }

        fn initialized(&self) -> bool {
            self.initialized.load(Ordering::Acquire)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Resolver answering every lookup with a fixed location list and
    /// fabricating units on demand.
    struct StubResolver {
        label: &'static str,
        locations: Vec<LocationKind>,
        fail_entries: Vec<&'static str>,
        resolved: Mutex<Vec<String>>,
        activated: Mutex<Vec<String>>,
    }

    impl StubResolver {
        fn new(label: &'static str, locations: Vec<LocationKind>) -> Self {
            Self {
                label,
                locations,
                fail_entries: Vec::new(),
                resolved: Mutex::new(Vec::new()),
                activated: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(mut self, entries: Vec<&'static str>) -> Self {
            self.fail_entries = entries;
            self
        }

        fn activated(&self) -> Vec<String> {
            self.activated.lock().unwrap().clone()
        }
    }

    impl Resolver for StubResolver {
        fn find_locations(
            &self,
            _logical_path: &str,
        ) -> std::result::Result<Vec<LocationKind>, BoxError> {
            Ok(self.locations.clone())
        }

        fn resolve(&self, entry_name: &str) -> std::result::Result<UnitHandle, BoxError> {
            if self.fail_entries.iter().any(|entry| *entry == entry_name) {
                return Err(format!("{entry_name} is broken").into());
            }
            self.resolved.lock().unwrap().push(entry_name.to_string());
            Ok(StubUnit::new(entry_name, false))
        }

        fn activate(&self, entry_name: &str) -> std::result::Result<UnitHandle, BoxError> {
            if self.fail_entries.iter().any(|entry| *entry == entry_name) {
                return Err(format!("{entry_name} is broken").into());
            }
            self.activated.lock().unwrap().push(entry_name.to_string());
            Ok(StubUnit::new(entry_name, true))
        }

        fn name(&self) -> &str {
            self.label
        }
    }

    fn package_dir(root: &Path, package: &str, classes: &[&str]) -> LocationKind {
        let dir = root.join(package);
        std::fs::create_dir_all(&dir).unwrap();
        for class in classes {
            std::fs::write(dir.join(format!("{class}.class")), b"\xCA\xFE\xBA\xBE").unwrap();
        }
        LocationKind::Directory { root: dir }
    }

    #[test]
    fn empty_name_is_invalid() {
        let resolver = Arc::new(StubResolver::new("stub", Vec::new()));
        let loader = PackageLoader::new(LoadingScope::single(resolver));
        assert!(matches!(
            loader.load_package("", &LoadOptions::default()),
            Err(LoaderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_package_is_not_found() {
        let resolver = Arc::new(StubResolver::new("stub", Vec::new()));
        let loader = PackageLoader::new(LoadingScope::single(resolver));
        assert!(matches!(
            loader.load_package("does.not.exist", &LoadOptions::default()),
            Err(LoaderError::PackageNotFound(_))
        ));
    }

    #[test]
    fn eager_mode_activates_everything() {
        let dir = tempdir().unwrap();
        let location = package_dir(dir.path(), "p", &["A", "B"]);
        let resolver = Arc::new(StubResolver::new("stub", vec![location]));
        let loader = PackageLoader::new(LoadingScope::single(resolver.clone()));

        let loaded = loader.load_package("p", &LoadOptions::eager()).unwrap();
        assert_eq!(loaded.names(), vec!["p.A", "p.B"]);
        assert!(loaded.units().all(|u| u.initialized()));
        assert_eq!(resolver.activated().len(), 2);
    }

    #[test]
    fn lazy_mode_never_activates() {
        let dir = tempdir().unwrap();
        let location = package_dir(dir.path(), "p", &["A", "B"]);
        let resolver = Arc::new(StubResolver::new("stub", vec![location]));
        let loader = PackageLoader::new(LoadingScope::single(resolver.clone()));

        let loaded = loader.load_package("p", &LoadOptions::lazy()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.units().all(|u| !u.initialized()));
        assert!(resolver.activated().is_empty());
    }

    #[test]
    fn predicate_mode_activates_selectively() {
        let dir = tempdir().unwrap();
        let location = package_dir(dir.path(), "p", &["A", "B", "C"]);
        let resolver = Arc::new(StubResolver::new("stub", vec![location]));
        let loader = PackageLoader::new(LoadingScope::single(resolver.clone()));

        let options = LoadOptions::when(|unit| unit.name().ends_with(".B"));
        let loaded = loader.load_package("p", &options).unwrap();

        assert_eq!(loaded.names(), vec!["p.A", "p.B", "p.C"]);
        assert!(loaded.get("p.B").unwrap().initialized());
        assert!(!loaded.get("p.A").unwrap().initialized());
        assert!(!loaded.get("p.C").unwrap().initialized());
        assert_eq!(resolver.activated(), vec!["p.B".to_string()]);
    }

    #[test]
    fn per_entry_failures_do_not_abort_the_call() {
        let dir = tempdir().unwrap();
        let location = package_dir(dir.path(), "p", &["Good", "Bad"]);
        let resolver =
            Arc::new(StubResolver::new("stub", vec![location]).failing_on(vec!["p.Bad"]));
        let loader = PackageLoader::new(LoadingScope::single(resolver));

        let loaded = loader.load_package("p", &LoadOptions::default()).unwrap();
        assert_eq!(loaded.names(), vec!["p.Good"]);
    }

    #[test]
    fn unreadable_location_contributes_nothing() {
        let dir = tempdir().unwrap();
        let good = package_dir(dir.path(), "p", &["X"]);
        let bogus = dir.path().join("bogus.jar");
        std::fs::write(&bogus, b"not a zip").unwrap();
        let broken = LocationKind::Archive {
            container: bogus,
            prefix: "p".to_string(),
        };

        let resolver = Arc::new(StubResolver::new("stub", vec![broken, good]));
        let loader = PackageLoader::new(LoadingScope::single(resolver));

        let loaded = loader.load_package("p", &LoadOptions::default()).unwrap();
        assert_eq!(loaded.names(), vec!["p.X"]);
    }

    #[test]
    fn all_locations_unreadable_still_returns_empty_result() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("bogus.jar");
        std::fs::write(&bogus, b"not a zip").unwrap();
        let broken = LocationKind::Archive {
            container: bogus,
            prefix: "p".to_string(),
        };

        let resolver = Arc::new(StubResolver::new("stub", vec![broken]));
        let loader = PackageLoader::new(LoadingScope::single(resolver));

        let loaded = loader.load_package("p", &LoadOptions::default()).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn later_location_retries_an_entry_that_failed_earlier() {
        let dir = tempdir().unwrap();
        let first = package_dir(dir.path(), "root1/p", &["X"]);
        let second = package_dir(dir.path(), "root2/p", &["X"]);

        // The first resolver owns the first location and refuses the
        // entry; the second resolver provides the same name successfully.
        let broken: Arc<dyn Resolver> =
            Arc::new(StubResolver::new("broken", vec![first]).failing_on(vec!["p.X"]));
        let working: Arc<dyn Resolver> = Arc::new(StubResolver::new("working", vec![second]));
        let scope = LoadingScope::new(vec![broken, working]).unwrap();
        let loader = PackageLoader::new(scope);

        let loaded = loader.load_package("p", &LoadOptions::lazy()).unwrap();
        assert_eq!(loaded.names(), vec!["p.X"]);
    }
}
