// ABOUTME: Deployment environment name (dev, staging, prod, ...).
// ABOUTME: Joined to the service name to form the repository path.

use super::service_name::{NameError, validate_component};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment(String);

impl Environment {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate_component("environment", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
