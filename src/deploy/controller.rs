// ABOUTME: Drives a validated request through the promotion states end to end.
// ABOUTME: Reports progress lines through Output and collects warnings.

use crate::builder::ImageBuilder;
use crate::diagnostics::Diagnostics;
use crate::output::Output;
use crate::registry::RegistryOps;
use crate::types::BackupId;

use super::error::DeployError;
use super::promotion::{Outcome, Plan, Promotion};
use super::request::DeploymentRequest;

/// Run a deploy or rollback against `registry`.
///
/// `builder` is only used in deploy mode. Nothing is retried and nothing is
/// undone on failure.
pub async fn execute<R, B>(
    request: DeploymentRequest,
    registry: &R,
    builder: &B,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<Outcome, DeployError>
where
    R: RegistryOps + ?Sized,
    B: ImageBuilder + ?Sized,
{
    match Promotion::new(request).plan() {
        Plan::Deploy(pending) => {
            output.progress(&format!("Deploying {}", pending.target()));

            output.progress("  → Rotating tags...");
            let rotated = pending
                .rotate(registry, BackupId::generate(), diag)
                .await?;
            if let Some(backup) = &rotated.state().rotation().backup {
                output.progress(&format!("  → Archived previous as {backup}"));
            }

            output.progress("  → Building image...");
            let built = rotated.build(builder).await?;

            output.progress("  → Pushing latest...");
            let completed = built.publish(registry).await?;

            Ok(completed.finish())
        }
        Plan::Rollback(pending) => {
            output.progress(&format!("Rolling back {}", pending.target()));

            output.progress("  → Restoring previous as latest...");
            let completed = pending.roll_back(registry).await?;

            Ok(completed.finish())
        }
    }
}
