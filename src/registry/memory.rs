// ABOUTME: In-memory registry: remote tag map, local tag map, and a call log.
// ABOUTME: Lets rotation logic be exercised without a container engine.

use super::error::RegistryError;
use super::ops::{RegistryCall, RegistryOps};
use super::sealed::Sealed;
use crate::types::{ImageId, ImageReference};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Default)]
struct State {
    remote: BTreeMap<String, ImageId>,
    local: HashMap<String, ImageId>,
    calls: Vec<RegistryCall>,
    failures: Vec<RegistryCall>,
}

/// A registry held in memory.
///
/// Tags map to opaque image identities. Clones share state, so a test can
/// keep a handle while the rotator owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    state: Arc<Mutex<State>>,
}

impl Sealed for MemoryRegistry {}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `image` under `reference` in the remote registry.
    pub fn seed(&self, reference: &ImageReference, image: impl Into<ImageId>) {
        self.state
            .lock()
            .remote
            .insert(reference.to_string(), image.into());
    }

    /// Make the given call fail with `RegistryError::Unavailable`.
    pub fn fail_on(&self, call: RegistryCall) {
        self.state.lock().failures.push(call);
    }

    /// Image behind `reference` in the remote registry.
    pub fn remote(&self, reference: &ImageReference) -> Option<ImageId> {
        self.state.lock().remote.get(&reference.to_string()).cloned()
    }

    /// Image behind `reference` in the local store.
    pub fn local(&self, reference: &ImageReference) -> Option<ImageId> {
        self.state.lock().local.get(&reference.to_string()).cloned()
    }

    /// Every remote tag, keyed by its rendered reference.
    pub fn remote_tags(&self) -> BTreeMap<String, ImageId> {
        self.state.lock().remote.clone()
    }

    /// Every call attempted so far, in order, including failed ones.
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.state.lock().calls.clone()
    }

    /// Place a freshly built image in the local store.
    pub(crate) fn store_local(&self, reference: &ImageReference, image: ImageId) {
        self.state.lock().local.insert(reference.to_string(), image);
    }

    fn begin(&self, call: RegistryCall) -> Result<parking_lot::MutexGuard<'_, State>, RegistryError> {
        let mut state = self.state.lock();
        let injected = state.failures.contains(&call);
        state.calls.push(call.clone());
        if injected {
            return Err(RegistryError::Unavailable(call.to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl RegistryOps for MemoryRegistry {
    async fn pull(&self, reference: &ImageReference) -> Result<bool, RegistryError> {
        let mut state = self.begin(RegistryCall::Pull(reference.clone()))?;
        let key = reference.to_string();
        match state.remote.get(&key).cloned() {
            Some(image) => {
                state.local.insert(key, image);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn tag(
        &self,
        source: &ImageReference,
        target: &ImageReference,
    ) -> Result<(), RegistryError> {
        let mut state = self.begin(RegistryCall::tag(source, target))?;
        let image = state
            .local
            .get(&source.to_string())
            .cloned()
            .ok_or_else(|| RegistryError::NotLocal(source.to_string()))?;
        state.local.insert(target.to_string(), image);
        Ok(())
    }

    async fn push(&self, reference: &ImageReference) -> Result<(), RegistryError> {
        let mut state = self.begin(RegistryCall::Push(reference.clone()))?;
        let key = reference.to_string();
        let image = state
            .local
            .get(&key)
            .cloned()
            .ok_or_else(|| RegistryError::NotLocal(key.clone()))?;
        state.remote.insert(key, image);
        Ok(())
    }

    async fn remove_local(&self, reference: &ImageReference) -> Result<(), RegistryError> {
        let mut state = self.begin(RegistryCall::RemoveLocal(reference.clone()))?;
        state
            .local
            .remove(&reference.to_string())
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotLocal(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Environment, RegistryAddress, ServiceName, Tag};

    fn reference(tag: Tag) -> ImageReference {
        ImageReference::new(
            RegistryAddress::new("registry.test").unwrap(),
            ServiceName::new("api").unwrap(),
            Environment::new("dev").unwrap(),
            tag,
        )
    }

    #[tokio::test]
    async fn pull_of_unknown_tag_reports_absent() {
        let registry = MemoryRegistry::new();
        assert!(!registry.pull(&reference(Tag::Latest)).await.unwrap());
        assert_eq!(registry.local(&reference(Tag::Latest)), None);
    }

    #[tokio::test]
    async fn push_requires_a_local_image() {
        let registry = MemoryRegistry::new();
        let err = registry.push(&reference(Tag::Latest)).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotLocal(_)));
    }

    #[tokio::test]
    async fn tag_then_push_copies_the_pointer() {
        let registry = MemoryRegistry::new();
        registry.seed(&reference(Tag::Latest), "img-a");

        registry.pull(&reference(Tag::Latest)).await.unwrap();
        registry
            .tag(&reference(Tag::Latest), &reference(Tag::Previous))
            .await
            .unwrap();
        registry.push(&reference(Tag::Previous)).await.unwrap();

        assert_eq!(
            registry.remote(&reference(Tag::Previous)),
            Some(ImageId::from("img-a"))
        );
    }

    #[tokio::test]
    async fn injected_failure_is_logged_and_returned() {
        let registry = MemoryRegistry::new();
        registry.seed(&reference(Tag::Latest), "img-a");
        registry.fail_on(RegistryCall::Pull(reference(Tag::Latest)));

        let err = registry.pull(&reference(Tag::Latest)).await.unwrap_err();
        assert!(matches!(err, RegistryError::Unavailable(_)));
        assert_eq!(
            registry.calls(),
            vec![RegistryCall::Pull(reference(Tag::Latest))]
        );
    }
}
