// ABOUTME: Tag rotation: shifts latest/previous/backup slots on deploy and rollback.
// ABOUTME: Each registry call is an explicit step with a recorded outcome.

use std::fmt;

use thiserror::Error;

use crate::diagnostics::{Diagnostics, Warning};
use crate::registry::{RegistryCall, RegistryError, RegistryOps};
use crate::types::{BackupId, ImageReference, Tag};

/// What happened at one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The call succeeded.
    Done,
    /// The pulled tag does not exist; tolerated.
    Absent,
    /// The pull failed; tolerated.
    Unreachable(String),
}

/// One attempted registry call and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub call: RegistryCall,
    pub outcome: StepOutcome,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            StepOutcome::Done => write!(f, "{}", self.call),
            StepOutcome::Absent => write!(f, "{} (absent)", self.call),
            StepOutcome::Unreachable(reason) => {
                write!(f, "{} (unreachable: {reason})", self.call)
            }
        }
    }
}

/// The steps of a finished rotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    pub steps: Vec<StepRecord>,
    /// Where the displaced `previous` was archived, if there was one.
    pub backup: Option<ImageReference>,
}

impl RotationReport {
    /// Calls in the order they were made.
    pub fn calls(&self) -> impl Iterator<Item = &RegistryCall> {
        self.steps.iter().map(|s| &s.call)
    }
}

/// Why a fatal step failed.
#[derive(Debug, Error)]
pub enum RotationFailure {
    #[error("no image tagged {0} in the registry")]
    SlotMissing(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A fatal step, with everything that completed before it.
///
/// Nothing is undone: the registry may be partially rotated.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct RotationError {
    pub step: RegistryCall,
    #[source]
    pub source: RotationFailure,
    pub completed: Vec<StepRecord>,
}

impl RotationError {
    pub fn is_slot_missing(&self) -> bool {
        matches!(self.source, RotationFailure::SlotMissing(_))
    }

    /// Exit status of the failing docker command, if there was one.
    pub fn exit_status(&self) -> Option<i32> {
        match &self.source {
            RotationFailure::Registry(err) => err.exit_status(),
            RotationFailure::SlotMissing(_) => None,
        }
    }
}

/// Runs the rotation sequences for one repository against a registry.
pub struct TagRotator<'a, R: ?Sized> {
    registry: &'a R,
    latest: ImageReference,
    previous: ImageReference,
    steps: Vec<StepRecord>,
}

impl<'a, R: RegistryOps + ?Sized> TagRotator<'a, R> {
    /// `target` picks the repository; its tag is ignored.
    pub fn new(registry: &'a R, target: &ImageReference) -> Self {
        Self {
            registry,
            latest: target.with_tag(Tag::Latest),
            previous: target.with_tag(Tag::Previous),
            steps: Vec::new(),
        }
    }

    /// Prepare history before a new build lands in `latest`.
    ///
    /// 1. Pull `previous`; absence or failure is tolerated with a warning.
    /// 2. If it was pulled: tag it as a fresh backup, push, drop the local tag.
    /// 3. Pull `latest` (required), tag it as `previous`, push, drop the local tag.
    ///
    /// The backup is pushed before `previous` is overwritten, so `previous`
    /// is never empty in between.
    pub async fn rotate_forward(
        mut self,
        backup_id: BackupId,
        diag: &mut Diagnostics,
    ) -> Result<RotationReport, RotationError> {
        let previous = self.previous.clone();
        let latest = self.latest.clone();

        let pull = RegistryCall::Pull(previous.clone());
        tracing::info!("{}", pull);
        let backup = match pull.apply(self.registry).await {
            Ok(true) => {
                self.record(pull, StepOutcome::Done);
                let backup = previous.with_tag(Tag::Backup(backup_id));
                self.step(RegistryCall::tag(&previous, &backup)).await?;
                self.step(RegistryCall::Push(backup.clone())).await?;
                self.step(RegistryCall::RemoveLocal(backup.clone())).await?;
                tracing::info!("Archived {} as {}", previous, backup);
                Some(backup)
            }
            Ok(false) => {
                self.record(pull, StepOutcome::Absent);
                diag.warn(Warning::previous_missing(&previous));
                None
            }
            Err(e) => {
                let reason = e.to_string();
                self.record(pull, StepOutcome::Unreachable(reason.clone()));
                diag.warn(Warning::previous_unreachable(&previous, &reason));
                None
            }
        };

        self.require(&latest).await?;
        self.step(RegistryCall::tag(&latest, &previous)).await?;
        self.step(RegistryCall::Push(previous.clone())).await?;
        self.step(RegistryCall::RemoveLocal(previous)).await?;

        Ok(RotationReport {
            steps: self.steps,
            backup,
        })
    }

    /// Reinstate `previous` as `latest`.
    ///
    /// `previous` is left as is, so a second rollback republishes the same
    /// image rather than going further back.
    pub async fn rollback_once(mut self) -> Result<RotationReport, RotationError> {
        let previous = self.previous.clone();
        let latest = self.latest.clone();

        self.require(&previous).await?;
        self.step(RegistryCall::tag(&previous, &latest)).await?;
        self.step(RegistryCall::Push(latest)).await?;

        Ok(RotationReport {
            steps: self.steps,
            backup: None,
        })
    }

    fn record(&mut self, call: RegistryCall, outcome: StepOutcome) {
        self.steps.push(StepRecord { call, outcome });
    }

    fn fail(&mut self, step: RegistryCall, source: RotationFailure) -> RotationError {
        RotationError {
            step,
            source,
            completed: std::mem::take(&mut self.steps),
        }
    }

    /// Run a step that must succeed.
    async fn step(&mut self, call: RegistryCall) -> Result<(), RotationError> {
        tracing::info!("{}", call);
        match call.apply(self.registry).await {
            Ok(_) => {
                self.record(call, StepOutcome::Done);
                Ok(())
            }
            Err(e) => Err(self.fail(call, e.into())),
        }
    }

    /// Pull a tag that must exist.
    async fn require(&mut self, reference: &ImageReference) -> Result<(), RotationError> {
        let call = RegistryCall::Pull(reference.clone());
        tracing::info!("{}", call);
        match call.apply(self.registry).await {
            Ok(true) => {
                self.record(call, StepOutcome::Done);
                Ok(())
            }
            Ok(false) => {
                let missing = RotationFailure::SlotMissing(reference.to_string());
                Err(self.fail(call, missing))
            }
            Err(e) => Err(self.fail(call, e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;
    use crate::types::{Environment, RegistryAddress, ServiceName};

    fn target() -> ImageReference {
        ImageReference::new(
            RegistryAddress::new("registry.test").unwrap(),
            ServiceName::new("api").unwrap(),
            Environment::new("dev").unwrap(),
            Tag::Latest,
        )
    }

    #[tokio::test]
    async fn unreachable_previous_is_tolerated() {
        let registry = MemoryRegistry::new();
        registry.seed(&target(), "img-a");
        registry.seed(&target().with_tag(Tag::Previous), "img-0");
        registry.fail_on(RegistryCall::Pull(target().with_tag(Tag::Previous)));
        let mut diag = Diagnostics::default();

        let report = TagRotator::new(&registry, &target())
            .rotate_forward(BackupId::generate(), &mut diag)
            .await
            .unwrap();

        assert!(report.backup.is_none());
        assert!(matches!(
            report.steps[0].outcome,
            StepOutcome::Unreachable(_)
        ));
        assert!(diag.has_warnings());
    }

    #[test]
    fn step_records_render_their_outcome() {
        let record = StepRecord {
            call: RegistryCall::Pull(target().with_tag(Tag::Previous)),
            outcome: StepOutcome::Absent,
        };
        assert_eq!(
            record.to_string(),
            "pull registry.test/api-dev:previous (absent)"
        );
    }
}
