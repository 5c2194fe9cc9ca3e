use clap::Parser;
use packscan_core::{InitPolicy, LoadOptions, LoaderError, LoaderRegistry, LoadingScope};
use packscan_jvm::ClasspathResolver;
use packscan_plugin::LoadedUnit;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "packscan",
    version,
    about = "Discover and load every class a package provides across a classpath",
    long_about = "Packscan walks an ordered list of classpath roots (directories and \
                  .jar/.zip archives), finds every physical location providing the \
                  requested package, and loads each class it contains. Overlapping \
                  roots are de-duplicated and broken entries are skipped rather than \
                  failing the whole run."
)]
pub struct Cli {
    /// Package to load (dot separated, e.g. com.example.service)
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Classpath entry (directory, archive, or file: URL); repeatable.
    /// Defaults to the CLASSPATH environment variable.
    #[arg(long = "cp", value_name = "PATH")]
    pub classpath: Vec<String>,

    /// Do not descend into sub-packages
    #[arg(long)]
    pub flat: bool,

    /// Load classes without running verification
    #[arg(long)]
    pub lazy: bool,

    /// Emit the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct ClassReport {
    pub name: String,
    pub initialized: bool,
}

#[derive(Debug, Serialize)]
pub struct LoadReport {
    pub package: String,
    pub classes: Vec<ClassReport>,
}

/// Interpret one classpath entry. `file:` URLs are percent-decoded into
/// plain paths; anything else is taken as a path verbatim.
pub fn parse_classpath_entry(raw: &str) -> PathBuf {
    if raw.starts_with("file:") {
        if let Ok(url) = url::Url::parse(raw) {
            if let Ok(path) = url.to_file_path() {
                return path;
            }
        }
    }
    PathBuf::from(raw)
}

pub fn run(cli: &Cli) -> Result<LoadReport, LoaderError> {
    let resolver = if cli.classpath.is_empty() {
        Arc::new(ClasspathResolver::from_env())
    } else {
        let roots = cli
            .classpath
            .iter()
            .map(|entry| parse_classpath_entry(entry))
            .collect();
        Arc::new(ClasspathResolver::new("cli", roots))
    };
    debug!("Assembled classpath with {} roots", resolver.roots().len());

    let registry = LoaderRegistry::new();
    let scope = LoadingScope::single(resolver);
    let loader = registry.loader(&scope);

    let options = LoadOptions {
        recursive: !cli.flat,
        init: if cli.lazy {
            InitPolicy::Lazy
        } else {
            InitPolicy::Eager
        },
    };
    let loaded = loader.load_package(&cli.package, &options)?;

    let mut classes: Vec<ClassReport> = loaded
        .units()
        .map(|unit| ClassReport {
            name: unit.name().to_string(),
            initialized: unit.initialized(),
        })
        .collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(LoadReport {
        package: cli.package.clone(),
        classes,
    })
}
