//! Enumeration of class entries inside one physical location.

use crate::error::{LoaderError, Result};
use crate::name::CLASS_SUFFIX;
use packscan_plugin::LocationKind;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::trace;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Enumerate the fully qualified names of all class entries in `location`.
///
/// `package_prefix` is the dot-separated package the location was resolved
/// for; `recursive` controls whether entries of deeper sub-packages are
/// included. Failures are scoped to this one location: an unreadable
/// directory or archive yields [`LoaderError::ResourceUnavailable`] and
/// the caller decides whether sibling locations still count.
pub fn enumerate(
    location: &LocationKind,
    package_prefix: &str,
    recursive: bool,
) -> Result<HashSet<String>> {
    match location {
        LocationKind::Directory { root } => enumerate_directory(root, package_prefix, recursive),
        LocationKind::Archive { container, prefix } => {
            enumerate_archive(container, prefix, recursive)
        }
    }
}

fn enumerate_directory(
    root: &Path,
    package_prefix: &str,
    recursive: bool,
) -> Result<HashSet<String>> {
    // Probe the root first so an unlistable directory fails as a whole
    // rather than silently yielding nothing.
    std::fs::read_dir(root).map_err(|err| LoaderError::ResourceUnavailable {
        location: root.display().to_string(),
        reason: err.to_string(),
    })?;

    let mut walk = WalkDir::new(root).min_depth(1);
    if !recursive {
        walk = walk.max_depth(1);
    }

    let mut names = HashSet::new();
    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                trace!("Skipping unreadable entry under {:?}: {}", root, err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative.to_string_lossy().into_owned(),
            Err(_) => continue,
        };
        let Some(stem) = relative.strip_suffix(CLASS_SUFFIX) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        let dotted = stem.replace(std::path::MAIN_SEPARATOR, ".");
        names.insert(format!("{package_prefix}.{dotted}"));
    }

    Ok(names)
}

fn enumerate_archive(container: &Path, prefix: &str, recursive: bool) -> Result<HashSet<String>> {
    let unavailable = |reason: String| LoaderError::ResourceUnavailable {
        location: container.display().to_string(),
        reason,
    };

    let file = File::open(container).map_err(|err| unavailable(err.to_string()))?;
    let archive = ZipArchive::new(file).map_err(|err| unavailable(err.to_string()))?;

    let prefix = prefix.trim_matches('/');
    let package_segments = prefix.split('/').count();

    let mut names = HashSet::new();
    for raw in archive.file_names() {
        let path = raw.strip_prefix('/').unwrap_or(raw);
        if !path.ends_with(CLASS_SUFFIX) {
            continue;
        }
        // Prefix must match at a segment boundary: `p/X.class` belongs to
        // `p`, `pq/X.class` does not.
        let under_prefix = path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'));
        if !under_prefix {
            continue;
        }
        let stem = &path[..path.len() - CLASS_SUFFIX.len()];
        let name = stem.replace('/', ".");
        if !recursive && name.matches('.').count() != package_segments {
            // Deeper sub-package entry.
            continue;
        }
        names.insert(name);
    }

    Ok(names)
}
