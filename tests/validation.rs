// ABOUTME: Integration tests for turning positional arguments into a request.
// ABOUTME: Covers mode selection, required parameters per mode, and name checks.

mod support;

use support::{ENVIRONMENT, REGISTRY, SERVICE, deploy_args, rollback_args};
use tagslot::deploy::{DeploymentRequest, Mode, ModeKind, ValidationError};
use tagslot::types::Tag;

mod mode_selection {
    use super::*;

    #[test]
    fn seven_arguments_deploy() {
        let request = DeploymentRequest::from_args(&deploy_args()).unwrap();
        assert_eq!(request.mode.kind(), ModeKind::Deploy);
        assert_eq!(request.service.as_str(), SERVICE);
        assert_eq!(request.environment.as_str(), ENVIRONMENT);
    }

    #[test]
    fn literal_rollback_selects_rollback() {
        let request = DeploymentRequest::from_args(&rollback_args()).unwrap();
        assert_eq!(request.mode, Mode::Rollback);
    }

    #[test]
    fn any_other_mode_deploys() {
        let mut args = deploy_args();
        args.push("Rollback");
        let request = DeploymentRequest::from_args(&args).unwrap();
        assert_eq!(request.mode.kind(), ModeKind::Deploy);
    }

    #[test]
    fn request_targets_the_service_repository() {
        let request = DeploymentRequest::from_args(&deploy_args()).unwrap();
        assert_eq!(
            request.reference(Tag::Latest).to_string(),
            format!("{REGISTRY}/{SERVICE}-{ENVIRONMENT}:latest")
        );
    }
}

mod required_parameters {
    use super::*;

    #[test]
    fn no_arguments_reports_environment() {
        let args: [&str; 0] = [];
        assert_eq!(
            DeploymentRequest::from_args(&args),
            Err(ValidationError::MissingParameter("environment"))
        );
    }

    #[test]
    fn deploy_needs_every_credential() {
        let names = [
            "access key id",
            "secret access key",
            "scm username",
            "scm token",
        ];
        for (index, name) in (2..6).zip(names) {
            let mut args = deploy_args();
            args[index] = " ";
            assert_eq!(
                DeploymentRequest::from_args(&args),
                Err(ValidationError::MissingParameter(name))
            );
        }
    }

    #[test]
    fn rollback_ignores_credentials() {
        let args = [ENVIRONMENT, REGISTRY, "", "", "", "", SERVICE, "rollback"];
        assert!(DeploymentRequest::from_args(&args).is_ok());
    }

    #[test]
    fn rollback_still_needs_the_service() {
        let args = [ENVIRONMENT, REGISTRY, "", "", "", "", "", "rollback"];
        assert_eq!(
            DeploymentRequest::from_args(&args),
            Err(ValidationError::MissingParameter("service name"))
        );
    }
}

mod names {
    use super::*;

    #[test]
    fn uppercase_service_is_invalid() {
        let mut args = deploy_args();
        args[6] = "Billing";
        assert!(matches!(
            DeploymentRequest::from_args(&args),
            Err(ValidationError::Invalid {
                parameter: "service name",
                ..
            })
        ));
    }

    #[test]
    fn registry_with_digest_is_invalid() {
        let mut args = deploy_args();
        args[1] = "registry.test@sha256";
        let err = DeploymentRequest::from_args(&args).unwrap_err();
        assert!(err.to_string().starts_with("invalid registry address"));
    }
}
