// ABOUTME: Entry point for the tagslot CLI application.
// ABOUTME: Parses arguments, loads config, and maps failures to exit codes.

mod cli;
mod commands;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::Cli;
use std::env;
use tagslot::config::Config;
use tagslot::deploy::DeploymentRequest;
use tagslot::error::Result;
use tagslot::output::Output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => exit_on_parse_error(e),
    };

    // RUST_LOG wins over --verbose
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());
    let result = run(&cli, output).await;

    if let Err(e) = result {
        let output = Output::new(cli.output_mode());
        output.error(&e.to_string());
        if e.is_usage() {
            eprintln!("{}", Cli::command().render_usage());
        }
        std::process::exit(e.exit_code());
    }
}

/// `--help` and `--version` exit 0; any other bad invocation exits 1 like a
/// validation failure.
fn exit_on_parse_error(e: clap::Error) -> ! {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            // Printing can only fail if stderr is gone; the exit code still applies.
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli, output: Output) -> Result<()> {
    let request = DeploymentRequest::from_args(&cli.positional())?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    commands::promote(request, &config, output).await
}
