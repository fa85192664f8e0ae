// ABOUTME: Configuration types and parsing for tagslot.yml.
// ABOUTME: Selects the engine and describes how the new image is built.

mod auth;
mod build;
mod env_value;

pub use auth::RegistryAuthConfig;
pub use build::BuildConfig;
pub use env_value::{EnvValue, resolve_env_map};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "tagslot.yml";
pub const CONFIG_FILENAME_ALT: &str = "tagslot.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".tagslot/config.yml";

/// Which adapter talks to the container engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Shell out to the docker CLI.
    #[default]
    Cli,
    /// Talk to the Engine API socket.
    Api,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineKind,

    #[serde(default = "default_docker_binary")]
    pub docker_binary: String,

    #[serde(default)]
    pub socket: Option<String>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub registry_auth: Option<RegistryAuthConfig>,
}

fn default_docker_binary() -> String {
    "docker".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: EngineKind::default(),
            docker_binary: default_docker_binary(),
            socket: None,
            build: BuildConfig::default(),
            registry_auth: None,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults config.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults if there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => {
                tracing::debug!("Using config {}", path.display());
                Self::load(&path)
            }
            None => {
                tracing::debug!("No config file in {}, using defaults", dir.display());
                Ok(Config::default())
            }
        }
    }

    /// Path of the config file `discover` would read.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }
}
