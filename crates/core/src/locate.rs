//! Resource location across a loading scope.

use crate::error::{LoaderError, Result};
use crate::scope::LoadingScope;
use packscan_plugin::ResourceLocation;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Find every physical location providing `logical_path` across the scope.
///
/// Resolvers are queried in scope order and their order is preserved in
/// the result; the locator imposes no parent-first/child-first policy of
/// its own. A location visible through more than one resolver is reported
/// once, at its first position. A resolver whose lookup fails is logged
/// and skipped; the result is only empty when no resolver reported
/// anything.
pub fn locate(logical_path: &str, scope: &LoadingScope) -> Result<Vec<ResourceLocation>> {
    if logical_path.is_empty() {
        return Err(LoaderError::InvalidArgument(
            "empty logical path".to_string(),
        ));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut locations = Vec::new();

    for resolver in scope.resolvers() {
        let kinds = match resolver.find_locations(logical_path) {
            Ok(kinds) => kinds,
            Err(err) => {
                warn!(
                    "Failed to query {} for {}: {}",
                    resolver.name(),
                    logical_path,
                    err
                );
                continue;
            }
        };

        for kind in kinds {
            let location = ResourceLocation::new(kind, Arc::clone(resolver));
            if seen.insert(location.identity()) {
                locations.push(location);
            } else {
                debug!("Dropping duplicate location {}", location.identity());
            }
        }
    }

    Ok(locations)
}
