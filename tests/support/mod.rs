// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup and request/reference fixtures.

use std::sync::Once;

use tagslot::deploy::DeploymentRequest;
use tagslot::types::{Environment, ImageReference, RegistryAddress, ServiceName, Tag};

pub const REGISTRY: &str = "123456789012.dkr.ecr.us-east-2.amazonaws.com";
pub const SERVICE: &str = "billing";
pub const ENVIRONMENT: &str = "staging";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("tagslot=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// The fixture repository with the given tag.
#[allow(dead_code)]
pub fn reference(tag: Tag) -> ImageReference {
    ImageReference::new(
        RegistryAddress::new(REGISTRY).unwrap(),
        ServiceName::new(SERVICE).unwrap(),
        Environment::new(ENVIRONMENT).unwrap(),
        tag,
    )
}

/// Positional arguments for a deploy of the fixture service.
#[allow(dead_code)]
pub fn deploy_args() -> Vec<&'static str> {
    vec![
        ENVIRONMENT,
        REGISTRY,
        "AKIAEXAMPLE",
        "wJalrXUtnFEMI",
        "ci-bot",
        "ghp_example",
        SERVICE,
    ]
}

/// Positional arguments for a rollback of the fixture service.
#[allow(dead_code)]
pub fn rollback_args() -> Vec<&'static str> {
    vec![ENVIRONMENT, REGISTRY, "", "", "", "", SERVICE, "rollback"]
}

#[allow(dead_code)]
pub fn deploy_request() -> DeploymentRequest {
    DeploymentRequest::from_args(&deploy_args()).unwrap()
}

#[allow(dead_code)]
pub fn rollback_request() -> DeploymentRequest {
    DeploymentRequest::from_args(&rollback_args()).unwrap()
}
