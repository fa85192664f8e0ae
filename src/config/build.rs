// ABOUTME: Build section of the config: context, Dockerfile, and build-arg names.
// ABOUTME: Resolves into the BuildSettings handed to an image builder.

use super::env_value::{EnvValue, resolve_env_map};
use crate::builder::{BuildArgNames, BuildSettings};
use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Build context directory.
    #[serde(default = "default_context")]
    pub context: PathBuf,

    /// Dockerfile path; defaults to `Dockerfile` inside the context.
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,

    #[serde(default)]
    pub args: BuildArgNames,

    #[serde(default)]
    pub extra_args: BTreeMap<String, EnvValue>,
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            context: default_context(),
            dockerfile: None,
            args: BuildArgNames::default(),
            extra_args: BTreeMap::new(),
        }
    }
}

impl BuildConfig {
    /// Resolve env references and fill in the default Dockerfile.
    pub fn settings(&self) -> Result<BuildSettings> {
        let dockerfile = self
            .dockerfile
            .clone()
            .unwrap_or_else(|| self.context.join("Dockerfile"));

        Ok(BuildSettings {
            context: self.context.clone(),
            dockerfile,
            names: self.args.clone(),
            extra_args: resolve_env_map(&self.extra_args)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dockerfile_defaults_to_the_context() {
        let config = BuildConfig {
            context: PathBuf::from("services/api"),
            ..Default::default()
        };
        let settings = config.settings().unwrap();
        assert_eq!(settings.dockerfile, PathBuf::from("services/api/Dockerfile"));
    }

    #[test]
    fn extra_args_are_resolved() {
        temp_env::with_var("TAGSLOT_TEST_REGION", Some("eu-west-1"), || {
            let mut config = BuildConfig::default();
            config.extra_args.insert(
                "AWS_DEFAULT_REGION".to_string(),
                EnvValue::FromEnv {
                    var: "TAGSLOT_TEST_REGION".to_string(),
                    default: None,
                },
            );
            let settings = config.settings().unwrap();
            assert_eq!(
                settings.extra_args.get("AWS_DEFAULT_REGION"),
                Some(&"eu-west-1".to_string())
            );
        });
    }
}
