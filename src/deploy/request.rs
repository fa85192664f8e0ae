// ABOUTME: Validates the positional invocation into a DeploymentRequest.
// ABOUTME: Decides deploy vs rollback mode once; nothing downstream re-parses it.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::builder::BuildArgs;
use crate::types::{Environment, ImageReference, RegistryAddress, ServiceName, Tag};

/// Literal trailing argument selecting rollback mode.
pub const ROLLBACK_ARG: &str = "rollback";

/// Positional parameter names, in invocation order.
const PARAMETERS: [&str; 7] = [
    "environment",
    "registry address",
    "access key id",
    "secret access key",
    "scm username",
    "scm token",
    "service name",
];

/// Errors from validating the invocation. No registry work has happened yet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid {parameter}: {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Rotate history, build, and publish a new `latest`.
    Deploy(BuildArgs),
    /// Reinstate `previous` as `latest`.
    Rollback,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Deploy(_) => ModeKind::Deploy,
            Mode::Rollback => ModeKind::Rollback,
        }
    }
}

/// Mode without its payload, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Deploy,
    Rollback,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeKind::Deploy => f.write_str("deploy"),
            ModeKind::Rollback => f.write_str("rollback"),
        }
    }
}

/// A validated request to deploy or roll back one service+environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub environment: Environment,
    pub registry: RegistryAddress,
    pub service: ServiceName,
    pub mode: Mode,
}

impl DeploymentRequest {
    /// Validate the raw positional arguments:
    /// `environment registry access-key-id secret-access-key scm-username
    /// scm-token service [mode]`.
    ///
    /// Absent and blank arguments both count as missing. Credentials are only
    /// required in deploy mode.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ValidationError> {
        let arg = |index: usize| {
            args.get(index)
                .map(|a| a.as_ref().trim())
                .filter(|a| !a.is_empty())
        };

        // The mode must be the exact literal, untrimmed.
        let rollback = args.get(7).map(|a| a.as_ref()) == Some(ROLLBACK_ARG);
        let required: &[usize] = if rollback {
            &[0, 1, 6]
        } else {
            &[0, 1, 2, 3, 4, 5, 6]
        };

        if let Some(&missing) = required.iter().find(|&&i| arg(i).is_none()) {
            return Err(ValidationError::MissingParameter(PARAMETERS[missing]));
        }

        // Every required index was checked above.
        let value = |index: usize| arg(index).unwrap_or_default();

        let environment = Environment::new(value(0)).map_err(|e| ValidationError::Invalid {
            parameter: PARAMETERS[0],
            reason: e.to_string(),
        })?;
        let registry = RegistryAddress::new(value(1)).map_err(|e| ValidationError::Invalid {
            parameter: PARAMETERS[1],
            reason: e.to_string(),
        })?;
        let service = ServiceName::new(value(6)).map_err(|e| ValidationError::Invalid {
            parameter: PARAMETERS[6],
            reason: e.to_string(),
        })?;

        let mode = if rollback {
            Mode::Rollback
        } else {
            Mode::Deploy(BuildArgs {
                access_key_id: value(2).to_string(),
                secret_access_key: value(3).to_string(),
                scm_username: value(4).to_string(),
                scm_token: value(5).to_string(),
            })
        };

        Ok(Self {
            environment,
            registry,
            service,
            mode,
        })
    }

    /// This request's repository with the given tag.
    pub fn reference(&self, tag: Tag) -> ImageReference {
        ImageReference::new(
            self.registry.clone(),
            self.service.clone(),
            self.environment.clone(),
            tag,
        )
    }
}
