pub mod error;
pub mod loader;
pub mod locate;
pub mod logging;
pub mod name;
pub mod registry;
pub mod scan;
pub mod scope;

pub use error::{LoaderError, Result};
pub use loader::{InitPolicy, LoadOptions, LoadedPackage, PackageLoader};
pub use registry::LoaderRegistry;
pub use scope::{LoadingScope, ScopeId};
