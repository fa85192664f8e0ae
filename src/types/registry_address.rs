// ABOUTME: Registry address validation (host[:port][/namespace]).
// ABOUTME: Rejects values that would corrupt the rendered image reference.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryAddressError {
    #[error("registry address cannot be empty")]
    Empty,

    #[error("invalid character in registry address: '{0}'")]
    InvalidChar(char),

    #[error("registry address must not end with '/'")]
    TrailingSlash,

    #[error("registry address must not carry a tag: {0}")]
    HasTag(String),
}

/// Address of the registry, e.g. `123456789012.dkr.ecr.us-east-2.amazonaws.com`
/// or `localhost:5000/team`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryAddress(String);

impl RegistryAddress {
    pub fn new(value: &str) -> Result<Self, RegistryAddressError> {
        if value.is_empty() {
            return Err(RegistryAddressError::Empty);
        }

        if let Some(c) = value.chars().find(|c| c.is_whitespace() || *c == '@') {
            return Err(RegistryAddressError::InvalidChar(c));
        }

        if value.ends_with('/') {
            return Err(RegistryAddressError::TrailingSlash);
        }

        // A colon is only a port separator in the host segment.
        if let Some((_, last)) = value.rsplit_once('/')
            && last.contains(':')
        {
            return Err(RegistryAddressError::HasTag(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
