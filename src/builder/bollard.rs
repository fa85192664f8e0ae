// ABOUTME: Image builds through the Docker Engine API using bollard.
// ABOUTME: Packages the build context as a tar archive and streams build output.

use super::ImageBuilder;
use super::args::{BuildArgs, BuildSettings};
use super::error::BuildError;
use crate::registry::sealed::Sealed;
use crate::types::{ImageId, ImageReference};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::BuildImageOptions;
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::{Either, Full};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Tar the build context directory into memory.
fn package_context(context: &Path) -> Result<Vec<u8>, BuildError> {
    let to_error = |source| BuildError::Context {
        path: context.to_path_buf(),
        source,
    };

    let mut archive = tar::Builder::new(Vec::new());
    archive.follow_symlinks(false);
    archive.append_dir_all(".", context).map_err(to_error)?;
    archive.into_inner().map_err(to_error)
}

/// Builder speaking the Docker Engine API.
pub struct BollardBuilder {
    client: Docker,
    settings: BuildSettings,
}

impl Sealed for BollardBuilder {}

impl BollardBuilder {
    pub fn new(client: Docker, settings: BuildSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl ImageBuilder for BollardBuilder {
    async fn build(
        &self,
        target: &ImageReference,
        args: &BuildArgs,
    ) -> Result<ImageId, BuildError> {
        tracing::info!("Building image: {}", target);

        let context: PathBuf = self.settings.context.clone();
        let tar_data = tokio::task::spawn_blocking(move || package_context(&context))
            .await
            .map_err(|e| BuildError::Engine(format!("context packaging task failed: {e}")))??;

        let buildargs: HashMap<String, String> = self.settings.arguments(args).into_iter().collect();
        let options = BuildImageOptions {
            dockerfile: self.settings.dockerfile_in_context().display().to_string(),
            t: Some(target.to_string()),
            buildargs: Some(buildargs),
            rm: true,
            forcerm: true,
            ..Default::default()
        };

        let body = Either::Left(Full::new(Bytes::from(tar_data)));
        let mut stream = self.client.build_image(options, None, Some(body));

        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| BuildError::Engine(e.to_string()))?;
            if let Some(detail) = info.error_detail {
                return Err(BuildError::Failed(
                    detail
                        .message
                        .unwrap_or_else(|| "unknown build error".to_string()),
                ));
            }
            if let Some(line) = info.stream {
                tracing::debug!("{}", line.trim_end());
            }
        }

        let inspect = self
            .client
            .inspect_image(&target.to_string())
            .await
            .map_err(|e| BuildError::Engine(e.to_string()))?;
        let id = inspect
            .id
            .ok_or_else(|| BuildError::Failed(format!("{} has no image id after build", target)))?;

        tracing::info!("Successfully built: {} ({})", target, id);
        Ok(ImageId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_archive_contains_the_dockerfile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "FROM scratch\n").unwrap();

        let data = package_context(dir.path()).unwrap();

        let mut archive = tar::Archive::new(data.as_slice());
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().display().to_string())
            .collect();
        assert!(names.iter().any(|n| n.ends_with("Dockerfile")));
    }

    #[test]
    fn missing_context_is_reported_with_its_path() {
        let err = package_context(Path::new("/nonexistent/tagslot-context")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tagslot-context"));
    }
}
