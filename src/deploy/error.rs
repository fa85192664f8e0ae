// ABOUTME: Error types for promotion operations with SNAFU context.
// ABOUTME: Wraps validation, rotation, build, and publish failures with the target tag.

use snafu::Snafu;

use crate::builder::BuildError;
use crate::registry::RegistryError;
use crate::types::ImageReference;

use super::request::ValidationError;
use super::rotation::RotationError;

/// Errors that end a deploy or rollback.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DeployError {
    #[snafu(display("{source}"))]
    Validation { source: ValidationError },

    #[snafu(display("could not rotate {target}: {source}"))]
    Rotation {
        target: ImageReference,
        source: RotationError,
    },

    #[snafu(display("could not roll back {target}: {source}"))]
    Rollback {
        target: ImageReference,
        source: RotationError,
    },

    #[snafu(display("could not build {target}: {source}"))]
    Build {
        target: ImageReference,
        source: BuildError,
    },

    #[snafu(display("could not push {target}: {source}"))]
    Publish {
        target: ImageReference,
        source: RegistryError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Bad or missing invocation parameters.
    Usage,
    /// A required slot (`latest` on deploy, `previous` on rollback) is empty.
    SlotMissing,
    /// A registry call failed during rotation.
    Registry,
    /// The image build failed.
    Build,
    /// Pushing the new `latest` failed.
    Publish,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Validation { .. } => DeployErrorKind::Usage,
            DeployError::Rotation { source, .. } | DeployError::Rollback { source, .. } => {
                if source.is_slot_missing() {
                    DeployErrorKind::SlotMissing
                } else {
                    DeployErrorKind::Registry
                }
            }
            DeployError::Build { .. } => DeployErrorKind::Build,
            DeployError::Publish { .. } => DeployErrorKind::Publish,
        }
    }

    /// Process exit code: the failing docker command's own status when there
    /// was one, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        let status = match self {
            DeployError::Validation { .. } => None,
            DeployError::Rotation { source, .. } | DeployError::Rollback { source, .. } => {
                source.exit_status()
            }
            DeployError::Build { source, .. } => source.exit_status(),
            DeployError::Publish { source, .. } => source.exit_status(),
        };
        match status {
            Some(code) if code != 0 => code,
            _ => 1,
        }
    }

    /// Steps that completed before a rotation failed.
    pub fn completed_steps(&self) -> &[super::rotation::StepRecord] {
        match self {
            DeployError::Rotation { source, .. } | DeployError::Rollback { source, .. } => {
                &source.completed
            }
            _ => &[],
        }
    }
}

impl From<ValidationError> for DeployError {
    fn from(source: ValidationError) -> Self {
        DeployError::Validation { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandError;
    use crate::registry::RegistryCall;
    use crate::types::{Environment, RegistryAddress, ServiceName, Tag};

    use super::super::rotation::RotationFailure;

    fn target() -> ImageReference {
        ImageReference::new(
            RegistryAddress::new("registry.test").unwrap(),
            ServiceName::new("api").unwrap(),
            Environment::new("dev").unwrap(),
            Tag::Latest,
        )
    }

    fn docker_failure(status: Option<i32>) -> RegistryError {
        RegistryError::Command(CommandError::Failed {
            command: "docker push registry.test/api-dev:latest".to_string(),
            status,
            stderr: "denied".to_string(),
        })
    }

    #[test]
    fn validation_errors_exit_with_one() {
        let err = DeployError::from(ValidationError::MissingParameter("service name"));
        assert_eq!(err.kind(), DeployErrorKind::Usage);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn docker_exit_status_is_propagated() {
        let err = DeployError::Publish {
            target: target(),
            source: docker_failure(Some(125)),
        };
        assert_eq!(err.kind(), DeployErrorKind::Publish);
        assert_eq!(err.exit_code(), 125);
    }

    #[test]
    fn signal_killed_command_exits_with_one() {
        let err = DeployError::Publish {
            target: target(),
            source: docker_failure(None),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_slot_is_classified() {
        let err = DeployError::Rollback {
            target: target(),
            source: RotationError {
                step: RegistryCall::Pull(target().with_tag(Tag::Previous)),
                source: RotationFailure::SlotMissing("registry.test/api-dev:previous".into()),
                completed: Vec::new(),
            },
        };
        assert_eq!(err.kind(), DeployErrorKind::SlotMissing);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("could not roll back registry.test/api-dev:latest"));
    }
}
