// ABOUTME: Promote command: runs a deploy or rollback and reports the result.
// ABOUTME: Emits collected warnings and any partial-rotation steps before failing.

use super::engine::{api_engine, build_settings, cli_engine};
use tagslot::builder::ImageBuilder;
use tagslot::config::{Config, EngineKind};
use tagslot::deploy::{self, DeploymentRequest, ModeKind};
use tagslot::diagnostics::Diagnostics;
use tagslot::error::Result;
use tagslot::output::Output;
use tagslot::registry::RegistryOps;

/// Deploy or roll back with the engine the config selects.
pub async fn promote(request: DeploymentRequest, config: &Config, output: Output) -> Result<()> {
    let settings = build_settings(config, &request.mode)?;

    match config.engine {
        EngineKind::Cli => {
            let (registry, builder) = cli_engine(config, settings, &output);
            run(request, &registry, &builder, output).await
        }
        EngineKind::Api => {
            let (registry, builder) = api_engine(config, settings, &output)?;
            run(request, &registry, &builder, output).await
        }
    }
}

async fn run<R, B>(
    request: DeploymentRequest,
    registry: &R,
    builder: &B,
    mut output: Output,
) -> Result<()>
where
    R: RegistryOps,
    B: ImageBuilder,
{
    output.start_timer();
    let mut diag = Diagnostics::default();

    let result = deploy::execute(request, registry, builder, &output, &mut diag).await;

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            for step in e.completed_steps() {
                output.warning(&format!("completed before the failure: {step}"));
            }
            return Err(e.into());
        }
    };

    tracing::debug!(
        "Finished {} of {} at {}",
        outcome.mode,
        outcome.target,
        outcome.finished_at.to_rfc3339()
    );

    match (outcome.mode, &outcome.image) {
        (ModeKind::Deploy, Some(image)) => {
            output.success(&format!("Deployed {} ({image})", outcome.target))
        }
        _ => output.success(&format!("Rolled back {}", outcome.target)),
    }
    Ok(())
}
