// ABOUTME: In-memory builder that places a fixed image into a MemoryRegistry.
// ABOUTME: Records the build args it was handed for later assertions.

use super::ImageBuilder;
use super::args::BuildArgs;
use super::error::BuildError;
use crate::registry::MemoryRegistry;
use crate::registry::sealed::Sealed;
use crate::types::{ImageId, ImageReference};
use async_trait::async_trait;
use parking_lot::Mutex;

/// Builds a predetermined image into the local store of a `MemoryRegistry`.
#[derive(Debug)]
pub struct MemoryBuilder {
    registry: MemoryRegistry,
    image: ImageId,
    fail_with: Option<String>,
    received: Mutex<Vec<BuildArgs>>,
}

impl Sealed for MemoryBuilder {}

impl MemoryBuilder {
    pub fn new(registry: &MemoryRegistry, image: impl Into<ImageId>) -> Self {
        Self {
            registry: registry.clone(),
            image: image.into(),
            fail_with: None,
            received: Mutex::new(Vec::new()),
        }
    }

    /// A builder whose every build fails with `message`.
    pub fn failing(registry: &MemoryRegistry, message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::new(registry, "unbuilt")
        }
    }

    /// Build args of every build attempted so far.
    pub fn received(&self) -> Vec<BuildArgs> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl ImageBuilder for MemoryBuilder {
    async fn build(
        &self,
        target: &ImageReference,
        args: &BuildArgs,
    ) -> Result<ImageId, BuildError> {
        self.received.lock().push(args.clone());
        if let Some(message) = &self.fail_with {
            return Err(BuildError::Failed(message.clone()));
        }
        self.registry.store_local(target, self.image.clone());
        Ok(self.image.clone())
    }
}
