// ABOUTME: Fully qualified image reference for one service+environment slot.
// ABOUTME: Renders as registry/service-environment:tag.

use std::fmt;

use super::{Environment, RegistryAddress, ServiceName, Tag};

/// `{registry}/{service}-{environment}:{tag}`.
///
/// The rendering is relied on by existing registries and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    registry: RegistryAddress,
    service: ServiceName,
    environment: Environment,
    tag: Tag,
}

impl ImageReference {
    pub fn new(
        registry: RegistryAddress,
        service: ServiceName,
        environment: Environment,
        tag: Tag,
    ) -> Self {
        Self {
            registry,
            service,
            environment,
            tag,
        }
    }

    /// The same repository with a different tag.
    pub fn with_tag(&self, tag: Tag) -> Self {
        Self {
            tag,
            ..self.clone()
        }
    }

    /// Everything before the `:tag` suffix.
    pub fn repository(&self) -> String {
        format!("{}/{}-{}", self.registry, self.service, self.environment)
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}-{}:{}",
            self.registry, self.service, self.environment, self.tag
        )
    }
}
