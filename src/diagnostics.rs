// ABOUTME: Diagnostics accumulator for non-fatal warnings during a rotation.
// ABOUTME: Collects tolerated registry misses that are shown after the run.

use crate::types::ImageReference;

/// Collects non-fatal warnings during deploy and rollback.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// `previous` does not exist yet, so there is nothing to archive.
    pub fn previous_missing(reference: &ImageReference) -> Self {
        Self {
            kind: WarningKind::PreviousMissing,
            message: format!("{reference} not found; nothing to archive"),
        }
    }

    /// `previous` could not be pulled; archival is skipped.
    pub fn previous_unreachable(reference: &ImageReference, reason: &str) -> Self {
        Self {
            kind: WarningKind::PreviousUnreachable,
            message: format!("could not pull {reference}, skipping archival: {reason}"),
        }
    }
}

/// Categories of warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// No `previous` tag in the registry.
    PreviousMissing,
    /// Pulling `previous` failed for another reason.
    PreviousUnreachable,
}
