// ABOUTME: Error types for image builds.
// ABOUTME: Covers build-context packaging, docker CLI, and engine failures.

use crate::process::CommandError;
use std::path::PathBuf;

/// Errors from building the new image.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to package build context {path}: {source}")]
    Context {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("build failed: {0}")]
    Failed(String),
}

impl BuildError {
    /// Exit status of the underlying docker command, when there was one.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            BuildError::Command(err) => err.exit_status(),
            _ => None,
        }
    }
}
