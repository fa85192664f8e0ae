// ABOUTME: Error types for registry operations.
// ABOUTME: Distinguishes missing local tags, command failures, and engine errors.

use crate::process::CommandError;

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no local image tagged {0}")]
    NotLocal(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("engine error for {reference}: {message}")]
    Engine { reference: String, message: String },

    #[error("registry unavailable for {0}")]
    Unavailable(String),
}

/// Wording registries use when the caller lacks access. Docker's "pull access
/// denied" text also says the repository "does not exist", so this is checked
/// before any not-found wording.
const DENIED_MARKERS: &[&str] = &[
    "denied",
    "unauthorized",
    "authentication required",
    "no basic auth credentials",
];

/// Wording for a tag or repository the registry does not have.
const MISSING_MARKERS: &[&str] = &["manifest unknown", "name unknown"];

/// Whether a failure message says access was refused.
pub(super) fn reports_denied(message: &str) -> bool {
    let message = message.to_lowercase();
    DENIED_MARKERS.iter().any(|m| message.contains(m))
}

/// Whether a pull failure message means the tag does not exist.
pub(super) fn reports_missing_tag(message: &str) -> bool {
    if reports_denied(message) {
        return false;
    }
    let message = message.to_lowercase();
    MISSING_MARKERS.iter().any(|m| message.contains(m))
        || message
            .split("manifest for ")
            .skip(1)
            .any(|rest| rest.contains(" not found"))
}

impl RegistryError {
    /// Exit status of the underlying docker command, when there was one.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            RegistryError::Command(err) => err.exit_status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_not_found_is_missing() {
        assert!(reports_missing_tag(
            "Error response from daemon: manifest for registry.test/api-dev:previous not found: manifest unknown: Requested image not found"
        ));
        assert!(reports_missing_tag(
            "manifest for registry.test/api-dev:previous not found"
        ));
    }

    #[test]
    fn unknown_repository_is_missing() {
        assert!(reports_missing_tag(
            "name unknown: The repository with name 'api-dev' does not exist in the registry"
        ));
    }

    #[test]
    fn pull_access_denied_is_not_missing() {
        assert!(!reports_missing_tag(
            "Error response from daemon: pull access denied for registry.test/api-dev, repository does not exist or may require 'docker login': denied: requested access to the resource is denied"
        ));
    }

    #[test]
    fn expired_credentials_are_not_missing() {
        assert!(!reports_missing_tag(
            "unauthorized: authentication required: manifest unknown"
        ));
    }

    #[test]
    fn unrelated_not_found_is_not_missing() {
        assert!(!reports_missing_tag(
            "dial tcp: lookup registry.test: no such host; endpoint not found"
        ));
    }
}
