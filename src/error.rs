// ABOUTME: Application-wide error types for tagslot.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::deploy::{DeployError, DeployErrorKind, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot connect to container engine: {0}")]
    Engine(String),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Deploy(e) => e.exit_code(),
            _ => 1,
        }
    }

    /// Whether the invocation itself was wrong, so usage should be shown.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Deploy(e) if e.kind() == DeployErrorKind::Usage)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Deploy(DeployError::from(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
