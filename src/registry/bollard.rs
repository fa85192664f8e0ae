// ABOUTME: Registry operations through the Docker Engine API using bollard.
// ABOUTME: Works with Docker and with Podman's Docker-compatible socket.

use super::error::{RegistryError, reports_denied, reports_missing_tag};
use super::ops::{RegistryCredentials, RegistryOps};
use super::sealed::Sealed;
use crate::types::ImageReference;
use async_trait::async_trait;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::query_parameters::{
    CreateImageOptions, PushImageOptions, RemoveImageOptions, TagImageOptions,
};
use futures::StreamExt;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn engine_error(e: bollard::errors::Error, reference: &ImageReference) -> RegistryError {
    RegistryError::Engine {
        reference: reference.to_string(),
        message: e.to_string(),
    }
}

/// A pull error meaning the tag does not exist in the registry.
///
/// The daemon answers 404 for "pull access denied" too, so denial wording
/// wins over the status code.
fn is_missing_tag(e: &bollard::errors::Error) -> bool {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => !reports_denied(message) && (*status_code == 404 || reports_missing_tag(message)),
        bollard::errors::Error::DockerStreamError { error } => reports_missing_tag(error),
        _ => false,
    }
}

fn map_local_tag_error(e: bollard::errors::Error, reference: &ImageReference) -> RegistryError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            RegistryError::NotLocal(reference.to_string())
        }
        _ => engine_error(e, reference),
    }
}

/// Connect to the local engine, through `socket` when given.
pub fn connect_engine(socket: Option<&str>) -> Result<Docker, bollard::errors::Error> {
    match socket {
        Some(path) => Docker::connect_with_unix(path, 120, bollard::API_DEFAULT_VERSION),
        None => Docker::connect_with_local_defaults(),
    }
}

/// Registry adapter speaking the Docker Engine API.
pub struct BollardRegistry {
    client: Docker,
    credentials: Option<DockerCredentials>,
}

impl Sealed for BollardRegistry {}

impl BollardRegistry {
    pub fn new(client: Docker, credentials: Option<RegistryCredentials>) -> Self {
        let credentials = credentials.map(|c| DockerCredentials {
            username: Some(c.username),
            password: Some(c.password),
            serveraddress: c.server,
            ..Default::default()
        });
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl RegistryOps for BollardRegistry {
    async fn pull(&self, reference: &ImageReference) -> Result<bool, RegistryError> {
        let opts = CreateImageOptions {
            from_image: Some(reference.repository()),
            tag: Some(reference.tag().to_string()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates - consume it
        let mut stream = self
            .client
            .create_image(Some(opts), None, self.credentials.clone());
        while let Some(result) = stream.next().await {
            match result {
                Ok(_) => {}
                Err(e) if is_missing_tag(&e) => {
                    tracing::debug!("{} is not in the registry: {}", reference, e);
                    return Ok(false);
                }
                Err(e) => return Err(engine_error(e, reference)),
            }
        }

        Ok(true)
    }

    async fn tag(
        &self,
        source: &ImageReference,
        target: &ImageReference,
    ) -> Result<(), RegistryError> {
        let opts = TagImageOptions {
            repo: Some(target.repository()),
            tag: Some(target.tag().to_string()),
            ..Default::default()
        };

        self.client
            .tag_image(&source.to_string(), Some(opts))
            .await
            .map_err(|e| map_local_tag_error(e, source))
    }

    async fn push(&self, reference: &ImageReference) -> Result<(), RegistryError> {
        let opts = PushImageOptions {
            tag: Some(reference.tag().to_string()),
            ..Default::default()
        };

        let mut stream = self.client.push_image(
            &reference.repository(),
            Some(opts),
            self.credentials.clone(),
        );
        while let Some(result) = stream.next().await {
            result.map_err(|e| map_local_tag_error(e, reference))?;
        }

        Ok(())
    }

    async fn remove_local(&self, reference: &ImageReference) -> Result<(), RegistryError> {
        // Untag only; layers shared with other local tags stay put.
        let opts = RemoveImageOptions {
            force: false,
            noprune: false,
            ..Default::default()
        };

        self.client
            .remove_image(&reference.to_string(), Some(opts), None)
            .await
            .map_err(|e| map_local_tag_error(e, reference))?;

        Ok(())
    }
}
