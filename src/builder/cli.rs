// ABOUTME: Image builds through `docker build`.
// ABOUTME: Build-arg values travel via the environment, never the argv.

use super::ImageBuilder;
use super::args::{BuildArgs, BuildSettings};
use super::error::BuildError;
use crate::process::DockerProcess;
use crate::registry::sealed::Sealed;
use crate::types::{ImageId, ImageReference};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Builder that shells out to `docker build`.
#[derive(Debug, Clone)]
pub struct DockerCliBuilder {
    process: DockerProcess,
    settings: BuildSettings,
}

impl Sealed for DockerCliBuilder {}

impl DockerCliBuilder {
    pub fn new(process: DockerProcess, settings: BuildSettings) -> Self {
        Self { process, settings }
    }

    /// Arguments for `docker build`. Each `--build-arg NAME` without a value
    /// makes docker read the value from its own environment.
    fn build_command(
        &self,
        target: &ImageReference,
        names: impl Iterator<Item = String>,
    ) -> Vec<String> {
        let mut command = vec![
            "build".to_string(),
            "--file".to_string(),
            self.settings.dockerfile.display().to_string(),
            "--tag".to_string(),
            target.to_string(),
        ];
        for name in names {
            command.push("--build-arg".to_string());
            command.push(name);
        }
        command.push(self.settings.context.display().to_string());
        command
    }
}

#[async_trait]
impl ImageBuilder for DockerCliBuilder {
    async fn build(
        &self,
        target: &ImageReference,
        args: &BuildArgs,
    ) -> Result<ImageId, BuildError> {
        tracing::info!("Building image: {}", target);

        let envs = self.settings.arguments(args);
        let command = self.build_command(target, envs.keys().cloned());
        self.process.run(&command, &envs).await?;

        let inspect = vec![
            "image".to_string(),
            "inspect".to_string(),
            "--format".to_string(),
            "{{.Id}}".to_string(),
            target.to_string(),
        ];
        let output = self.process.run(&inspect, &BTreeMap::new()).await?;
        let id = output.stdout.trim();
        if id.is_empty() {
            return Err(BuildError::Failed(format!(
                "{} has no image id after build",
                target
            )));
        }

        tracing::info!("Successfully built: {} ({})", target, id);
        Ok(ImageId::new(id))
    }
}
