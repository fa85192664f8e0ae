// ABOUTME: Registry credentials for the Engine API adapter.
// ABOUTME: The docker CLI engine uses its own login state instead.

use super::env_value::EnvValue;
use crate::error::Result;
use crate::registry::RegistryCredentials;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryAuthConfig {
    pub username: EnvValue,
    pub password: EnvValue,
    /// Registry server address; the engine infers it when omitted.
    #[serde(default)]
    pub server: Option<String>,
}

impl RegistryAuthConfig {
    pub fn resolve(&self) -> Result<RegistryCredentials> {
        Ok(RegistryCredentials {
            username: self.username.resolve()?,
            password: self.password.resolve()?,
            server: self.server.clone(),
        })
    }
}
