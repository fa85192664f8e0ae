// ABOUTME: Config values given literally or read from an environment variable.
// ABOUTME: Keeps secrets like registry passwords out of the config file.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// The value, reading the environment for `{env: NAME}` entries.
    pub fn resolve(&self) -> Result<String> {
        let (var, default) = match self {
            EnvValue::Literal(value) => return Ok(value.clone()),
            EnvValue::FromEnv { var, default } => (var, default),
        };

        match (std::env::var(var), default) {
            (Ok(value), _) => Ok(value),
            (Err(_), Some(default)) => {
                tracing::debug!("{} is unset, using its default", var);
                Ok(default.clone())
            }
            (Err(_), None) => Err(Error::MissingEnvVar(var.clone())),
        }
    }
}

/// Resolve every value, failing on the first unset variable without a default.
pub fn resolve_env_map(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    map.iter()
        .map(|(name, value)| value.resolve().map(|resolved| (name.clone(), resolved)))
        .collect()
}
