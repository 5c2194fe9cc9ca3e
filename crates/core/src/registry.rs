//! Loader registry: one [`PackageLoader`] per scope identity.

use crate::loader::PackageLoader;
use crate::scope::{LoadingScope, ScopeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Cache of package loaders keyed by scope identity.
///
/// Constructed by the host application and shared by reference. A loader
/// is built once per distinct scope identity and never evicted or
/// rebuilt; concurrent first requests for the same identity race on the
/// write lock and only the winner constructs.
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: RwLock<HashMap<ScopeId, Arc<PackageLoader>>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the loader for `scope`, building it on first request.
    pub fn loader(&self, scope: &LoadingScope) -> Arc<PackageLoader> {
        let id = scope.id();

        if let Some(loader) = self.loaders.read().unwrap().get(&id) {
            return Arc::clone(loader);
        }

        let mut loaders = self.loaders.write().unwrap();
        // Re-check: another thread may have built the loader while we
        // waited for the write lock.
        if let Some(loader) = loaders.get(&id) {
            return Arc::clone(loader);
        }

        debug!("Building package loader for scope {:?}", id);
        let loader = Arc::new(PackageLoader::new(scope.clone()));
        loaders.insert(id, Arc::clone(&loader));
        loader
    }

    /// Number of distinct scope identities seen so far.
    pub fn len(&self) -> usize {
        self.loaders.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.read().unwrap().is_empty()
    }
}
