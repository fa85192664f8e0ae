// ABOUTME: Builder capability: produces the new image tagged as latest.
// ABOUTME: Docker CLI, Docker Engine API, and in-memory implementations.

mod args;
mod bollard;
mod cli;
mod error;
mod memory;

pub use self::bollard::BollardBuilder;
pub use args::{BuildArgNames, BuildArgs, BuildSettings};
pub use cli::DockerCliBuilder;
pub use error::BuildError;
pub use memory::MemoryBuilder;

use crate::registry::sealed::Sealed;
use crate::types::{ImageId, ImageReference};
use async_trait::async_trait;

/// Builds the image that becomes the new `latest`.
#[async_trait]
pub trait ImageBuilder: Sealed + Send + Sync {
    /// Build from the configured context and tag the result locally as
    /// `target`. Credentials in `args` are handed to the build untouched.
    async fn build(
        &self,
        target: &ImageReference,
        args: &BuildArgs,
    ) -> Result<ImageId, BuildError>;
}
