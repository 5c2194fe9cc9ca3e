//! Package and entry naming.

use crate::error::{LoaderError, Result};

/// Separator between segments of a qualified name.
pub const PACKAGE_SEPARATOR: char = '.';

/// Separator used in logical (resource) paths.
pub const PATH_SEPARATOR: char = '/';

/// Suffix identifying class entries in directories and archives.
pub const CLASS_SUFFIX: &str = ".class";

/// A validated, dot-separated package name.
///
/// Immutable once parsed. Converts deterministically to the slash-separated
/// logical path used for resource lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Parse and normalize a package name.
    ///
    /// A leading path marker (`/` or `.`) is stripped and any remaining
    /// path separators are rewritten to package separators, so
    /// `/com/example` and `com.example` parse to the same name. An empty
    /// name (after normalization) is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().trim_start_matches([PATH_SEPARATOR, PACKAGE_SEPARATOR]);
        if normalized.is_empty() {
            return Err(LoaderError::InvalidArgument(format!(
                "empty package name {raw:?}"
            )));
        }
        Ok(Self(normalized.replace(PATH_SEPARATOR, ".")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Slash-separated logical path used to query resolvers.
    ///
    /// # Examples
    /// ```
    /// # use packscan_core::name::PackageName;
    /// let name = PackageName::parse("com.example").unwrap();
    /// assert_eq!(name.logical_path(), "com/example");
    /// ```
    pub fn logical_path(&self) -> String {
        self.0.replace(PACKAGE_SEPARATOR, "/")
    }

    /// Number of package segments.
    pub fn depth(&self) -> usize {
        self.0.split(PACKAGE_SEPARATOR).count()
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
