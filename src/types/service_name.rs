// ABOUTME: Service name validation for registry repository paths.
// ABOUTME: Shares the path-component rules with Environment.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{0} exceeds maximum length of 128 characters")]
    TooLong(&'static str),

    #[error("{0} must start and end with a letter or digit")]
    BadBoundary(&'static str),

    #[error("{0} must be lowercase")]
    NotLowercase(&'static str),

    #[error("invalid character in {0}: '{1}'")]
    InvalidChar(&'static str, char),
}

/// Check `value` against the repository path-component grammar: lowercase
/// alphanumerics joined by `.`, `_` or `-`.
pub(super) fn validate_component(what: &'static str, value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty(what));
    }

    if value.len() > 128 {
        return Err(NameError::TooLong(what));
    }

    for c in value.chars() {
        if c.is_ascii_uppercase() {
            return Err(NameError::NotLowercase(what));
        }
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && !matches!(c, '.' | '_' | '-') {
            return Err(NameError::InvalidChar(what, c));
        }
    }

    let is_alnum = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !is_alnum(value.chars().next()) || !is_alnum(value.chars().last()) {
        return Err(NameError::BadBoundary(what));
    }

    Ok(())
}

/// Name of the deployed service (e.g. a lambda function).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate_component("service name", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
