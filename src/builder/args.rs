// ABOUTME: Build arguments: the four pass-through credentials and their names.
// ABOUTME: Secrets are redacted from Debug output.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Credentials passed through to the image build. Never inspected.
#[derive(Clone, PartialEq, Eq)]
pub struct BuildArgs {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub scm_username: String,
    pub scm_token: String,
}

impl fmt::Debug for BuildArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildArgs")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("scm_username", &self.scm_username)
            .field("scm_token", &"<redacted>")
            .finish()
    }
}

/// Build-arg names under which each credential reaches the Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildArgNames {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub scm_username: String,
    pub scm_token: String,
}

impl Default for BuildArgNames {
    fn default() -> Self {
        Self {
            access_key_id: "AWS_ACCESS_KEY_ID".to_string(),
            secret_access_key: "AWS_SECRET_ACCESS_KEY".to_string(),
            scm_username: "SCM_USERNAME".to_string(),
            scm_token: "SCM_TOKEN".to_string(),
        }
    }
}

/// Where and how to build, with extra args already resolved.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub context: PathBuf,
    pub dockerfile: PathBuf,
    pub names: BuildArgNames,
    pub extra_args: BTreeMap<String, String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            context: PathBuf::from("."),
            dockerfile: PathBuf::from("Dockerfile"),
            names: BuildArgNames::default(),
            extra_args: BTreeMap::new(),
        }
    }
}

impl BuildSettings {
    /// The full build-arg map. Credentials win over extra args of the same name.
    pub fn arguments(&self, args: &BuildArgs) -> BTreeMap<String, String> {
        let mut merged = self.extra_args.clone();
        merged.insert(self.names.access_key_id.clone(), args.access_key_id.clone());
        merged.insert(
            self.names.secret_access_key.clone(),
            args.secret_access_key.clone(),
        );
        merged.insert(self.names.scm_username.clone(), args.scm_username.clone());
        merged.insert(self.names.scm_token.clone(), args.scm_token.clone());
        merged
    }

    /// Dockerfile path as the engine expects it: relative to the context.
    pub fn dockerfile_in_context(&self) -> PathBuf {
        self.dockerfile
            .strip_prefix(&self.context)
            .map(PathBuf::from)
            .unwrap_or_else(|_| self.dockerfile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BuildArgs {
        BuildArgs {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "s3cr3t".to_string(),
            scm_username: "deployer".to_string(),
            scm_token: "ghp_token".to_string(),
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", args());
        assert!(rendered.contains("AKIAEXAMPLE"));
        assert!(!rendered.contains("s3cr3t"));
        assert!(!rendered.contains("ghp_token"));
    }

    #[test]
    fn credentials_override_extra_args() {
        let mut settings = BuildSettings::default();
        settings
            .extra_args
            .insert("SCM_TOKEN".to_string(), "stale".to_string());
        settings
            .extra_args
            .insert("AWS_DEFAULT_REGION".to_string(), "us-east-2".to_string());

        let merged = settings.arguments(&args());
        assert_eq!(merged.get("SCM_TOKEN"), Some(&"ghp_token".to_string()));
        assert_eq!(
            merged.get("AWS_DEFAULT_REGION"),
            Some(&"us-east-2".to_string())
        );
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn dockerfile_is_made_relative_to_context() {
        let settings = BuildSettings {
            context: PathBuf::from("services/api"),
            dockerfile: PathBuf::from("services/api/docker/Dockerfile"),
            ..Default::default()
        };
        assert_eq!(
            settings.dockerfile_in_context(),
            PathBuf::from("docker/Dockerfile")
        );
    }
}
