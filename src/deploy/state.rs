// ABOUTME: Promotion state marker types for the type state pattern.
// ABOUTME: Each state carries only the data that exists at that point.

use crate::builder::BuildArgs;
use crate::types::ImageId;

use super::request::{Mode, ModeKind};
use super::rotation::RotationReport;

/// Initial state: parameters validated, mode decided.
/// Available actions: `plan()`
#[derive(Debug, Clone)]
pub struct Validated {
    pub(crate) mode: Mode,
}

/// Deploy chosen, nothing touched yet.
/// Available actions: `rotate()`
#[derive(Debug, Clone)]
pub struct DeployPending {
    pub(crate) build_args: BuildArgs,
}

/// Rollback chosen, nothing touched yet.
/// Available actions: `roll_back()`
#[derive(Debug, Clone, Copy, Default)]
pub struct RollbackPending;

/// History shifted: `previous` holds the old `latest`.
/// Available actions: `build()`
#[derive(Debug, Clone)]
pub struct Rotated {
    pub(crate) build_args: BuildArgs,
    pub(crate) rotation: RotationReport,
}

impl Rotated {
    pub fn rotation(&self) -> &RotationReport {
        &self.rotation
    }
}

/// New image built and tagged locally as `latest`.
/// Available actions: `publish()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) rotation: RotationReport,
    pub(crate) image: ImageId,
}

impl Built {
    pub fn image(&self) -> &ImageId {
        &self.image
    }
}

/// `latest` published in the registry.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) mode: ModeKind,
    pub(crate) rotation: RotationReport,
    pub(crate) image: Option<ImageId>,
}
