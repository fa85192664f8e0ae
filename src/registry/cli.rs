// ABOUTME: Registry operations through the docker CLI.
// ABOUTME: Uses the CLI's own login state; failures keep docker's exit status.

use super::error::{RegistryError, reports_missing_tag};
use super::ops::RegistryOps;
use super::sealed::Sealed;
use crate::process::{CommandError, DockerProcess};
use crate::types::ImageReference;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Whether a failed pull means "no such tag" rather than an outage or an
/// auth failure.
fn is_missing_tag(err: &CommandError) -> bool {
    reports_missing_tag(err.stderr())
}

/// Registry adapter that shells out to `docker` (or a compatible binary).
#[derive(Debug, Clone)]
pub struct DockerCli {
    process: DockerProcess,
}

impl Sealed for DockerCli {}

impl DockerCli {
    pub fn new(process: DockerProcess) -> Self {
        Self { process }
    }

    async fn docker(&self, args: &[&str]) -> Result<(), CommandError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.process.run(&args, &BTreeMap::new()).await.map(|_| ())
    }
}

#[async_trait]
impl RegistryOps for DockerCli {
    async fn pull(&self, reference: &ImageReference) -> Result<bool, RegistryError> {
        match self.docker(&["pull", &reference.to_string()]).await {
            Ok(()) => Ok(true),
            Err(err) if is_missing_tag(&err) => {
                tracing::debug!("{} is not in the registry", reference);
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn tag(
        &self,
        source: &ImageReference,
        target: &ImageReference,
    ) -> Result<(), RegistryError> {
        self.docker(&["tag", &source.to_string(), &target.to_string()])
            .await
            .map_err(RegistryError::from)
    }

    async fn push(&self, reference: &ImageReference) -> Result<(), RegistryError> {
        self.docker(&["push", &reference.to_string()])
            .await
            .map_err(RegistryError::from)
    }

    async fn remove_local(&self, reference: &ImageReference) -> Result<(), RegistryError> {
        self.docker(&["rmi", &reference.to_string()])
            .await
            .map_err(RegistryError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stderr: &str) -> CommandError {
        CommandError::Failed {
            command: "docker pull x".to_string(),
            status: Some(1),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn manifest_unknown_is_a_missing_tag() {
        assert!(is_missing_tag(&failed(
            "Error response from daemon: manifest unknown: manifest tagged by \"previous\" is not found"
        )));
    }

    #[test]
    fn denied_is_not_a_missing_tag() {
        assert!(!is_missing_tag(&failed(
            "Error response from daemon: pull access denied, repository requires authentication"
        )));
    }

    #[test]
    fn pull_access_denied_is_not_a_missing_tag() {
        assert!(!is_missing_tag(&failed(
            "Error response from daemon: pull access denied for registry.test/api-dev, repository does not exist or may require 'docker login': denied: requested access to the resource is denied"
        )));
    }

    #[test]
    fn spawn_failure_is_not_a_missing_tag() {
        let err = CommandError::Spawn {
            program: "docker".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!is_missing_tag(&err));
    }
}
