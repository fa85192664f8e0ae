// ABOUTME: Shared helper for building the engine adapters named in the config.
// ABOUTME: Build settings and registry credentials are resolved here.

use tagslot::builder::{BollardBuilder, BuildSettings, DockerCliBuilder};
use tagslot::config::Config;
use tagslot::deploy::Mode;
use tagslot::error::{Error, Result};
use tagslot::output::Output;
use tagslot::process::DockerProcess;
use tagslot::registry::{BollardRegistry, DockerCli, connect_engine};

/// Build settings for this run. Rollbacks never build, so their
/// `extra_args` env references are not resolved.
pub fn build_settings(config: &Config, mode: &Mode) -> Result<BuildSettings> {
    match mode {
        Mode::Deploy(_) => config.build.settings(),
        Mode::Rollback => Ok(BuildSettings::default()),
    }
}

/// Adapters that shell out to the docker CLI.
pub fn cli_engine(
    config: &Config,
    settings: BuildSettings,
    output: &Output,
) -> (DockerCli, DockerCliBuilder) {
    let process = DockerProcess::new(config.docker_binary.as_str());
    output.progress(&format!("  → Using {} CLI", process.program()));
    (
        DockerCli::new(process.clone()),
        DockerCliBuilder::new(process, settings),
    )
}

/// Adapters that speak the Engine API over the local socket.
pub fn api_engine(
    config: &Config,
    settings: BuildSettings,
    output: &Output,
) -> Result<(BollardRegistry, BollardBuilder)> {
    let client =
        connect_engine(config.socket.as_deref()).map_err(|e| Error::Engine(e.to_string()))?;
    output.progress(&format!(
        "  → Connected to engine at {}",
        config.socket.as_deref().unwrap_or("default socket")
    ));

    let credentials = config
        .registry_auth
        .as_ref()
        .map(|auth| auth.resolve())
        .transpose()?;

    Ok((
        BollardRegistry::new(client.clone(), credentials),
        BollardBuilder::new(client, settings),
    ))
}
