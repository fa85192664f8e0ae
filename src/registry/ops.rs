// ABOUTME: Registry operations trait: pull, tag, push, remove local tag.
// ABOUTME: Also defines RegistryCall, the record of one attempted operation.

use super::error::RegistryError;
use super::sealed::Sealed;
use crate::types::ImageReference;
use async_trait::async_trait;
use std::fmt;

/// Tag-pointer operations against a registry and the local image store.
///
/// The rotator never inspects image contents, only tag pointers.
#[async_trait]
pub trait RegistryOps: Sealed + Send + Sync {
    /// Pull `reference` into the local store.
    ///
    /// Returns `Ok(false)` when the registry has no such tag.
    async fn pull(&self, reference: &ImageReference) -> Result<bool, RegistryError>;

    /// Point the local tag `target` at the image behind local `source`.
    async fn tag(
        &self,
        source: &ImageReference,
        target: &ImageReference,
    ) -> Result<(), RegistryError>;

    /// Publish the local `reference` to the registry.
    async fn push(&self, reference: &ImageReference) -> Result<(), RegistryError>;

    /// Drop the local tag `reference`. The registry is not touched.
    async fn remove_local(&self, reference: &ImageReference) -> Result<(), RegistryError>;
}

/// One registry operation, as attempted by the rotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Pull(ImageReference),
    Tag {
        source: ImageReference,
        target: ImageReference,
    },
    Push(ImageReference),
    RemoveLocal(ImageReference),
}

impl RegistryCall {
    pub fn tag(source: &ImageReference, target: &ImageReference) -> Self {
        RegistryCall::Tag {
            source: source.clone(),
            target: target.clone(),
        }
    }

    /// Dispatch this call against `registry`.
    ///
    /// Only `Pull` can report `false`; every other call reports `true` on success.
    pub async fn apply<R: RegistryOps + ?Sized>(&self, registry: &R) -> Result<bool, RegistryError> {
        match self {
            RegistryCall::Pull(reference) => registry.pull(reference).await,
            RegistryCall::Tag { source, target } => {
                registry.tag(source, target).await.map(|()| true)
            }
            RegistryCall::Push(reference) => registry.push(reference).await.map(|()| true),
            RegistryCall::RemoveLocal(reference) => {
                registry.remove_local(reference).await.map(|()| true)
            }
        }
    }
}

impl fmt::Display for RegistryCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryCall::Pull(reference) => write!(f, "pull {reference}"),
            RegistryCall::Tag { source, target } => write!(f, "tag {source} {target}"),
            RegistryCall::Push(reference) => write!(f, "push {reference}"),
            RegistryCall::RemoveLocal(reference) => write!(f, "remove {reference}"),
        }
    }
}

/// Credentials for registry pulls and pushes through the Engine API.
///
/// The docker CLI engine uses the credentials from `docker login` instead.
#[derive(Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
    pub server: Option<String>,
}

impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}
