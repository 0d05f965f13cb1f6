//! Subcommand dispatch.

use std::io::Write;

use anyhow::Context;
use checks::{CheckRunId, Checker, PullRequestNumber, RepositoryRef, Timestamp, WorkflowRunId};
use tracing::info;

use crate::config::Command;

/// Runs one subcommand against `checker`, writing its result to `out`.
pub async fn execute(
    checker: &impl Checker,
    repo: &RepositoryRef,
    workflow_run: Option<WorkflowRunId>,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Diff { number } => {
            let diff = checker
                .get_pull_request_diff(repo, PullRequestNumber::new(number))
                .await
                .with_context(|| format!("failed to fetch diff of {repo}#{number}"))?;
            out.write_all(diff.as_bytes())?;
        }
        Command::Create(args) => {
            let options = args.into_options(Timestamp::now());
            let run = checker
                .create_check_run(repo, &options, workflow_run)
                .await
                .with_context(|| format!("failed to create check run '{}'", options.name))?;
            info!(check_run_id = %run.id, "Check run ready");
            serde_json::to_writer_pretty(&mut *out, &run)?;
            writeln!(out)?;
        }
        Command::Update(args) => {
            let check_run_id = CheckRunId::new(args.check_run_id);
            let options = args.into_options(Timestamp::now());
            let run = checker
                .update_check_run(repo, check_run_id, &options)
                .await
                .with_context(|| format!("failed to update check run {check_run_id}"))?;
            serde_json::to_writer_pretty(&mut *out, &run)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
