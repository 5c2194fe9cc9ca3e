//! JVM classpath resolver for packscan.
//!
//! [`ClasspathResolver`] implements the `packscan-plugin` resolver
//! contract over an ordered list of classpath roots (directories and
//! `.jar`/`.zip` archives), with optional parent delegation. Units are
//! class files parsed with `ristretto_classfile`; activation runs
//! class-file verification once per unit.

pub mod classpath;
pub mod unit;

pub use classpath::ClasspathResolver;
pub use unit::ClassUnit;
