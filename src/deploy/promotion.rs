// ABOUTME: Promotion struct parameterized by state marker, with its transitions.
// ABOUTME: Each transition consumes self, so steps cannot be skipped or reordered.

use chrono::{DateTime, Utc};
use snafu::ResultExt;

use crate::builder::ImageBuilder;
use crate::diagnostics::Diagnostics;
use crate::registry::RegistryOps;
use crate::types::{BackupId, ImageId, ImageReference, Tag};

use super::error::{BuildSnafu, DeployError, PublishSnafu, RollbackSnafu, RotationSnafu};
use super::request::{DeploymentRequest, Mode, ModeKind};
use super::rotation::{RotationReport, TagRotator};
use super::state::{Built, Completed, DeployPending, RollbackPending, Rotated, Validated};

/// A promotion of one service+environment, parameterized by its current state.
///
/// `target` is always the repository's `latest` tag. State types carry the
/// data produced so far, so a built image only exists once `build()` ran.
#[derive(Debug)]
pub struct Promotion<S> {
    target: ImageReference,
    state: S,
}

/// The path chosen by the request's mode.
#[derive(Debug)]
pub enum Plan {
    Deploy(Promotion<DeployPending>),
    Rollback(Promotion<RollbackPending>),
}

/// Summary of a finished promotion.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub mode: ModeKind,
    /// The `latest` tag that was published.
    pub target: ImageReference,
    pub rotation: RotationReport,
    /// The freshly built image; `None` for rollbacks.
    pub image: Option<ImageId>,
    pub finished_at: DateTime<Utc>,
}

impl<S> Promotion<S> {
    /// The `latest` tag this promotion publishes.
    pub fn target(&self) -> &ImageReference {
        &self.target
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    fn transition<T>(self, state: T) -> Promotion<T> {
        Promotion {
            target: self.target,
            state,
        }
    }
}

// =============================================================================
// Validated -> DeployPending | RollbackPending
// =============================================================================

impl Promotion<Validated> {
    pub fn new(request: DeploymentRequest) -> Self {
        Promotion {
            target: request.reference(Tag::Latest),
            state: Validated { mode: request.mode },
        }
    }

    /// Split on the mode decided at validation.
    pub fn plan(self) -> Plan {
        match self.state.mode.clone() {
            Mode::Deploy(build_args) => Plan::Deploy(self.transition(DeployPending { build_args })),
            Mode::Rollback => Plan::Rollback(self.transition(RollbackPending)),
        }
    }
}

// =============================================================================
// DeployPending -> Rotated -> Built -> Completed
// =============================================================================

impl Promotion<DeployPending> {
    /// Archive `previous` under `backup_id` and shift `latest` into `previous`.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Rotation` if `latest` is missing or any required
    /// registry call fails. Completed steps are kept in the error.
    pub async fn rotate<R: RegistryOps + ?Sized>(
        self,
        registry: &R,
        backup_id: BackupId,
        diag: &mut Diagnostics,
    ) -> Result<Promotion<Rotated>, DeployError> {
        let rotation = TagRotator::new(registry, &self.target)
            .rotate_forward(backup_id, diag)
            .await
            .context(RotationSnafu {
                target: self.target.clone(),
            })?;

        let build_args = self.state.build_args.clone();
        Ok(self.transition(Rotated {
            build_args,
            rotation,
        }))
    }
}

impl Promotion<Rotated> {
    /// Build the new image, tagged locally as `latest`.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Build` if the builder fails. The registry is
    /// left rotated: `latest` and `previous` both hold the old image.
    pub async fn build<B: ImageBuilder + ?Sized>(
        self,
        builder: &B,
    ) -> Result<Promotion<Built>, DeployError> {
        tracing::info!("Building {}", self.target);
        let image = builder
            .build(&self.target, &self.state.build_args)
            .await
            .context(BuildSnafu {
                target: self.target.clone(),
            })?;
        tracing::debug!("Built {} as {}", self.target, image);

        let rotation = self.state.rotation.clone();
        Ok(self.transition(Built { rotation, image }))
    }
}

impl Promotion<Built> {
    /// Push the built `latest`.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Publish` if the push fails.
    pub async fn publish<R: RegistryOps + ?Sized>(
        self,
        registry: &R,
    ) -> Result<Promotion<Completed>, DeployError> {
        tracing::info!("push {}", self.target);
        registry.push(&self.target).await.context(PublishSnafu {
            target: self.target.clone(),
        })?;

        let Built { rotation, image } = self.state.clone();
        Ok(self.transition(Completed {
            mode: ModeKind::Deploy,
            rotation,
            image: Some(image),
        }))
    }
}

// =============================================================================
// RollbackPending -> Completed
// =============================================================================

impl Promotion<RollbackPending> {
    /// Republish `previous` as `latest`.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Rollback` if `previous` is missing or any
    /// registry call fails.
    pub async fn roll_back<R: RegistryOps + ?Sized>(
        self,
        registry: &R,
    ) -> Result<Promotion<Completed>, DeployError> {
        let rotation = TagRotator::new(registry, &self.target)
            .rollback_once()
            .await
            .context(RollbackSnafu {
                target: self.target.clone(),
            })?;

        Ok(self.transition(Completed {
            mode: ModeKind::Rollback,
            rotation,
            image: None,
        }))
    }
}

impl Promotion<Completed> {
    pub fn finish(self) -> Outcome {
        Outcome {
            mode: self.state.mode,
            target: self.target,
            rotation: self.state.rotation,
            image: self.state.image,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MemoryBuilder;
    use crate::registry::MemoryRegistry;

    fn request(args: &[&str]) -> DeploymentRequest {
        DeploymentRequest::from_args(args).unwrap()
    }

    #[test]
    fn plan_follows_the_request_mode() {
        let deploy = Promotion::new(request(&[
            "dev",
            "registry.test",
            "k",
            "s",
            "u",
            "t",
            "api",
        ]));
        assert!(matches!(deploy.plan(), Plan::Deploy(_)));

        let rollback = Promotion::new(request(&[
            "dev",
            "registry.test",
            "",
            "",
            "",
            "",
            "api",
            "rollback",
        ]));
        assert!(matches!(rollback.plan(), Plan::Rollback(_)));
    }

    #[tokio::test]
    async fn build_failure_leaves_the_registry_rotated() {
        let registry = MemoryRegistry::new();
        let promotion = Promotion::new(request(&[
            "dev",
            "registry.test",
            "k",
            "s",
            "u",
            "t",
            "api",
        ]));
        let latest = promotion.target().clone();
        registry.seed(&latest, "img-a");

        let Plan::Deploy(pending) = promotion.plan() else {
            panic!("expected deploy plan");
        };
        let rotated = pending
            .rotate(&registry, BackupId::generate(), &mut Diagnostics::default())
            .await
            .unwrap();
        let err = rotated
            .build(&MemoryBuilder::failing(&registry, "compile error"))
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Build { .. }));
        assert_eq!(registry.remote(&latest), Some(ImageId::from("img-a")));
        assert_eq!(
            registry.remote(&latest.with_tag(Tag::Previous)),
            Some(ImageId::from("img-a"))
        );
    }
}
