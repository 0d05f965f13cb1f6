//! ci-checks CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: flags with `GITHUB_*` environment fallbacks
//!    (see [`config::Cli`]).
//! 2. **Wire observability**: `tracing-subscriber` to stderr, plus an
//!    OpenTelemetry OTLP exporter when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Construct infrastructure**: a [`github::GitHubRestClient`] wrapped in a
//!    [`checks::CheckerClient`].
//! 4. **Dispatch** the requested subcommand (`diff`, `create`, `update`).

mod commands;
mod config;
mod telemetry;

use std::process::ExitCode;

use anyhow::Context;
use checks::CheckerClient;
use clap::Parser;
use github::GitHubRestClient;

use crate::config::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match telemetry::init(cli.log_format) {
        Ok(telemetry) => telemetry,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = run(cli).await;
    if let Err(err) = &result {
        tracing::error!(error = ?err, "ci-checks failed");
    }
    telemetry.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let api = GitHubRestClient::new(&cli.client_config())
        .context("failed to construct GitHub client")?;
    let checker = CheckerClient::new(api);
    let workflow_run = cli.workflow_run_id();

    let mut stdout = std::io::stdout().lock();
    commands::execute(
        &checker,
        &cli.repository,
        workflow_run,
        cli.command,
        &mut stdout,
    )
    .await
}
