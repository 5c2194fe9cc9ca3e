//! Physical locations backing a package.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::resolver::Resolver;

/// Where a package physically lives: a filesystem directory or a region
/// inside an archive file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    /// A directory whose children are the package's entries.
    Directory { root: PathBuf },

    /// An archive (`.jar`/`.zip`) and the internal path prefix under which
    /// the package's entries are stored.
    Archive { container: PathBuf, prefix: String },
}

impl LocationKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            LocationKind::Directory { .. } => "directory",
            LocationKind::Archive { .. } => "archive",
        }
    }

    /// Normalized identity used for de-duplication.
    ///
    /// Two locations reachable through different resolvers (e.g. a child
    /// resolver and the parent it delegates to) compare equal here when
    /// they point at the same physical place.
    pub fn identity(&self) -> String {
        match self {
            LocationKind::Directory { root } => format!("dir:{}", normalize(root)),
            LocationKind::Archive { container, prefix } => {
                format!("jar:{}!/{}", normalize(container), prefix.trim_matches('/'))
            }
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

fn normalize(path: &Path) -> String {
    // Fall back to the raw path when it does not (yet) exist on disk.
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    absolute.to_string_lossy().into_owned()
}

/// A physical location paired with the resolver that reported it, so
/// materialization can be routed back to the owner.
#[derive(Clone)]
pub struct ResourceLocation {
    pub kind: LocationKind,
    pub resolver: Arc<dyn Resolver>,
}

impl ResourceLocation {
    pub fn new(kind: LocationKind, resolver: Arc<dyn Resolver>) -> Self {
        Self { kind, resolver }
    }

    pub fn identity(&self) -> String {
        self.kind.identity()
    }
}

impl PartialEq for ResourceLocation {
    fn eq(&self, other: &Self) -> bool {
        // Value equality is by normalized physical identity; the owning
        // resolver is routing metadata, not part of the value.
        self.kind.identity() == other.kind.identity()
    }
}

impl Eq for ResourceLocation {}

impl fmt::Debug for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLocation")
            .field("kind", &self.kind)
            .field("resolver", &self.resolver.name())
            .finish()
    }
}
