//! Classpath-backed resolver.

use crate::unit::ClassUnit;
use dashmap::DashMap;
use packscan_plugin::{BoxError, LocationKind, Resolver, UnitHandle};
use ristretto_classfile::ClassFile;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace};
use zip::ZipArchive;

const CLASS_SUFFIX: &str = ".class";

/// Root extensions treated as archive containers.
const ARCHIVE_EXTENSIONS: [&str; 2] = ["jar", "zip"];

/// A resolver over an ordered list of classpath roots (directories and
/// `.jar`/`.zip` archives), with optional parent delegation.
///
/// Units are cached per resolver, so racing materializations of the same
/// name all end up with the first successfully inserted unit. With a
/// parent set, the parent is consulted first for both location discovery
/// and materialization (the classloader delegation convention); the
/// engine de-duplicates locations visible through both.
pub struct ClasspathResolver {
    label: String,
    roots: Vec<PathBuf>,
    parent: Option<Arc<dyn Resolver>>,
    units: DashMap<String, Arc<ClassUnit>>,
    activations: AtomicUsize,
}

impl ClasspathResolver {
    pub fn new(label: impl Into<String>, roots: Vec<PathBuf>) -> Self {
        Self {
            label: label.into(),
            roots,
            parent: None,
            units: DashMap::new(),
            activations: AtomicUsize::new(0),
        }
    }

    /// Build a resolver from the `CLASSPATH` environment variable, split
    /// with the platform path-list separator. An unset variable yields a
    /// resolver with no roots.
    pub fn from_env() -> Self {
        let raw = std::env::var_os("CLASSPATH").unwrap_or_default();
        let roots = std::env::split_paths(&raw)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        Self::new("classpath", roots)
    }

    /// Delegate to `parent` before consulting this resolver's own roots.
    pub fn with_parent(mut self, parent: Arc<dyn Resolver>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The already-materialized unit for `entry_name`, if any. The analog
    /// of `ClassLoader::findLoadedClass`; does not consult the parent.
    pub fn loaded_unit(&self, entry_name: &str) -> Option<UnitHandle> {
        self.units.get(entry_name).map(|unit| {
            let concrete: Arc<ClassUnit> = Arc::clone(&unit);
            let handle: UnitHandle = concrete;
            handle
        })
    }

    /// Number of unit activations this resolver has performed.
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::Relaxed)
    }

    fn is_archive(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ARCHIVE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }

    fn archive_has_prefix(container: &Path, logical_path: &str) -> bool {
        let Ok(file) = File::open(container) else {
            return false;
        };
        let Ok(archive) = ZipArchive::new(file) else {
            return false;
        };
        let want = format!("{}/", logical_path.trim_matches('/'));
        archive
            .file_names()
            .any(|name| name.strip_prefix('/').unwrap_or(name).starts_with(&want))
    }

    fn load_unit(&self, entry_name: &str) -> Result<Arc<ClassUnit>, BoxError> {
        if let Some(unit) = self.units.get(entry_name) {
            return Ok(Arc::clone(&unit));
        }

        let bytes = self.read_class_bytes(entry_name)?;
        let class_file = ClassFile::from_bytes(&mut Cursor::new(bytes))?;
        let unit = Arc::new(ClassUnit::new(entry_name.to_string(), class_file));

        // First insert wins under a race; everyone gets the stored unit.
        let stored = self.units.entry(entry_name.to_string()).or_insert(unit);
        Ok(Arc::clone(&stored))
    }

    fn read_class_bytes(&self, entry_name: &str) -> Result<Vec<u8>, BoxError> {
        let relative = entry_name.replace('.', "/") + CLASS_SUFFIX;

        for root in &self.roots {
            if root.is_dir() {
                let candidate = root.join(&relative);
                if candidate.is_file() {
                    trace!("Reading class file {:?}", candidate);
                    return Ok(std::fs::read(candidate)?);
                }
            } else if Self::is_archive(root) {
                match Self::read_from_archive(root, &relative) {
                    Ok(Some(bytes)) => {
                        trace!("Reading {} from archive {:?}", entry_name, root);
                        return Ok(bytes);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        debug!("Skipping unreadable archive {:?}: {}", root, err);
                    }
                }
            }
        }

        Err(format!("class {entry_name} not found under {}", self.label).into())
    }

    fn read_from_archive(container: &Path, relative: &str) -> Result<Option<Vec<u8>>, BoxError> {
        let file = File::open(container)?;
        let mut archive = ZipArchive::new(file)?;
        match archive.by_name(relative) {
            Ok(mut entry) => {
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;
                Ok(Some(bytes))
            }
            Err(zip::result::ZipError::FileNotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl Resolver for ClasspathResolver {
    fn find_locations(&self, logical_path: &str) -> Result<Vec<LocationKind>, BoxError> {
        let mut locations = Vec::new();

        if let Some(parent) = &self.parent {
            // Parent-first: delegated locations come before our own.
            match parent.find_locations(logical_path) {
                Ok(delegated) => locations.extend(delegated),
                Err(err) => {
                    debug!("Parent lookup via {} failed: {}", parent.name(), err);
                }
            }
        }

        for root in &self.roots {
            if root.is_dir() {
                let package_dir = root.join(logical_path);
                if package_dir.is_dir() {
                    locations.push(LocationKind::Directory { root: package_dir });
                }
            } else if Self::is_archive(root) && Self::archive_has_prefix(root, logical_path) {
                locations.push(LocationKind::Archive {
                    container: root.clone(),
                    prefix: logical_path.to_string(),
                });
            }
        }

        Ok(locations)
    }

    fn resolve(&self, entry_name: &str) -> Result<UnitHandle, BoxError> {
        if let Some(parent) = &self.parent {
            if let Ok(unit) = parent.resolve(entry_name) {
                return Ok(unit);
            }
        }
        let unit = self.load_unit(entry_name)?;
        Ok(unit)
    }

    fn activate(&self, entry_name: &str) -> Result<UnitHandle, BoxError> {
        if let Some(parent) = &self.parent {
            if let Ok(unit) = parent.activate(entry_name) {
                return Ok(unit);
            }
        }
        let unit = self.load_unit(entry_name)?;
        if unit.activate()? {
            self.activations.fetch_add(1, Ordering::Relaxed);
            trace!("Activated class unit {}", entry_name);
        }
        Ok(unit)
    }

    fn name(&self) -> &str {
        &self.label
    }
}
