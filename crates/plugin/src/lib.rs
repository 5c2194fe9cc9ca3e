//! Trait and data definitions shared by the packscan engine and its resolvers.
//!
//! This crate defines the resolver boundary:
//! - [`Resolver`] — one member of a loading scope; owns both location
//!   discovery and unit materialization (analogous to a classloader)
//! - [`ResourceLocation`] / [`LocationKind`] — physical locations backing a
//!   package (directories and archive regions)
//! - [`LoadedUnit`] / [`UnitHandle`] — materialized units
//!
//! Concrete resolvers live in their own crates (e.g. `packscan-jvm`'s
//! classpath resolver); the engine in `packscan-core` only ever talks to
//! these traits.

pub mod location;
pub mod resolver;

pub use location::{LocationKind, ResourceLocation};
pub use resolver::{BoxError, LoadedUnit, Resolver, UnitHandle};
