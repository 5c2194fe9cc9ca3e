use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("package not found: {0}")]
    PackageNotFound(String),
    #[error("resource unavailable at {location}: {reason}")]
    ResourceUnavailable { location: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("resolver error: {0}")]
    Resolver(String),
}

impl From<packscan_plugin::BoxError> for LoaderError {
    fn from(err: packscan_plugin::BoxError) -> Self {
        LoaderError::Resolver(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoaderError>;
