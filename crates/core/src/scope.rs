//! Loading scopes and their identities.

use crate::error::{LoaderError, Result};
use packscan_plugin::Resolver;
use std::fmt;
use std::sync::Arc;

/// An ordered, non-empty sequence of resolvers queried together as one
/// logical unit.
///
/// Immutable once constructed. Two scopes share an identity only when
/// their resolver sequences are reference-equal in the same order; cloning
/// a scope preserves its identity.
#[derive(Clone)]
pub struct LoadingScope {
    resolvers: Arc<[Arc<dyn Resolver>]>,
}

impl LoadingScope {
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Result<Self> {
        if resolvers.is_empty() {
            return Err(LoaderError::InvalidArgument(
                "a loading scope needs at least one resolver".to_string(),
            ));
        }
        Ok(Self {
            resolvers: resolvers.into(),
        })
    }

    pub fn single(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolvers: vec![resolver].into(),
        }
    }

    pub fn resolvers(&self) -> &[Arc<dyn Resolver>] {
        &self.resolvers
    }

    /// Identity used as the loader-registry cache key.
    pub fn id(&self) -> ScopeId {
        ScopeId(
            self.resolvers
                .iter()
                .map(|r| Arc::as_ptr(r) as *const () as usize)
                .collect(),
        )
    }
}

impl fmt::Debug for LoadingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.resolvers.iter().map(|r| r.name()))
            .finish()
    }
}

/// Reference identity of a scope's resolver sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeId(Vec<usize>);
