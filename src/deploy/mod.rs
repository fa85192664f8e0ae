// ABOUTME: Promotion orchestration: validation, tag rotation, and the type state pipeline.
// ABOUTME: Exports the request, rotator, state markers, and the end-to-end controller.

mod controller;
mod error;
mod promotion;
mod request;
mod rotation;
mod state;

pub use controller::execute;
pub use error::{DeployError, DeployErrorKind};
pub use promotion::{Outcome, Plan, Promotion};
pub use request::{DeploymentRequest, Mode, ModeKind, ROLLBACK_ARG, ValidationError};
pub use rotation::{
    RotationError, RotationFailure, RotationReport, StepOutcome, StepRecord, TagRotator,
};
pub use state::{Built, Completed, DeployPending, RollbackPending, Rotated, Validated};
