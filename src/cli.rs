// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Positional parameters are optional here so validation can name the missing one.

use clap::Parser;
use tagslot::output::OutputMode;

#[derive(Parser)]
#[command(name = "tagslot")]
#[command(about = "Promote a freshly built image to latest, keeping one generation for rollback")]
#[command(version)]
pub struct Cli {
    /// Show debug logging, including every registry call
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the final result, warnings, and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Config file (default: tagslot.yml in the working directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Target environment, e.g. dev or prod
    #[arg(value_name = "ENVIRONMENT", allow_hyphen_values = true)]
    pub environment: Option<String>,

    /// Registry address, e.g. 123456789012.dkr.ecr.us-east-2.amazonaws.com
    #[arg(value_name = "REGISTRY", allow_hyphen_values = true)]
    pub registry: Option<String>,

    /// Access key id passed to the build
    #[arg(value_name = "ACCESS_KEY_ID", allow_hyphen_values = true)]
    pub access_key_id: Option<String>,

    /// Secret access key passed to the build
    #[arg(value_name = "SECRET_ACCESS_KEY", allow_hyphen_values = true)]
    pub secret_access_key: Option<String>,

    /// SCM username passed to the build
    #[arg(value_name = "SCM_USERNAME", allow_hyphen_values = true)]
    pub scm_username: Option<String>,

    /// SCM token passed to the build
    #[arg(value_name = "SCM_TOKEN", allow_hyphen_values = true)]
    pub scm_token: Option<String>,

    /// Service name
    #[arg(value_name = "SERVICE", allow_hyphen_values = true)]
    pub service: Option<String>,

    /// `rollback` to reinstate the previous image; anything else deploys
    #[arg(value_name = "MODE", allow_hyphen_values = true)]
    pub mode: Option<String>,
}

impl Cli {
    /// Positional arguments in invocation order; absent ones are empty.
    pub fn positional(&self) -> Vec<String> {
        [
            &self.environment,
            &self.registry,
            &self.access_key_id,
            &self.secret_access_key,
            &self.scm_username,
            &self.scm_token,
            &self.service,
            &self.mode,
        ]
        .into_iter()
        .map(|arg| arg.clone().unwrap_or_default())
        .collect()
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}
