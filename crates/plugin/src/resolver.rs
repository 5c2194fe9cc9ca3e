//! The resolver capability boundary.

use std::any::Any;
use std::sync::Arc;

use crate::location::LocationKind;

/// Error type crossing the resolver boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared handle to a materialized unit.
pub type UnitHandle = Arc<dyn LoadedUnit>;

/// A unit (class-like entry) that has been materialized by a resolver.
pub trait LoadedUnit: Send + Sync {
    /// Fully qualified entry name, e.g. `com.example.Foo`.
    fn name(&self) -> &str;

    /// Whether the unit's one-shot initialization has run.
    fn initialized(&self) -> bool;

    /// Access to the runtime-specific representation for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// One member of a loading scope: owns location discovery and unit
/// materialization for the roots it covers.
///
/// Materialization is split into two phases so callers can inspect a unit
/// before deciding whether its initialization should run:
/// - [`resolve`](Resolver::resolve) loads a unit without initializing it
/// - [`activate`](Resolver::activate) loads it and runs its one-shot
///   initialization
///
/// Both phases must behave idempotently under concurrent calls for the
/// same name: racing threads may each invoke them, but every caller must
/// end up holding the same unit.
pub trait Resolver: Send + Sync {
    /// All physical locations under this resolver that provide
    /// `logical_path` (a slash-separated package path such as
    /// `com/example`). Order matters; callers de-duplicate across
    /// resolvers, not the resolver itself.
    fn find_locations(&self, logical_path: &str) -> Result<Vec<LocationKind>, BoxError>;

    /// Materialize `entry_name` without running its initialization.
    fn resolve(&self, entry_name: &str) -> Result<UnitHandle, BoxError>;

    /// Materialize `entry_name` and run its one-shot initialization.
    /// Calling this for an already-initialized unit returns the same
    /// handle without re-running anything.
    fn activate(&self, entry_name: &str) -> Result<UnitHandle, BoxError>;

    /// Resolver name for logging and diagnostics.
    fn name(&self) -> &str;
}
