//! Command-line and environment configuration.
//!
//! Every option has an environment fallback matching the variables GitHub
//! Actions exports to jobs, so inside a workflow the binary usually needs
//! nothing but a subcommand.

use checks::{
    CheckConclusion, CheckRunOutput, CheckStatus, CommitSha, CreateCheckRunOptions,
    RepositoryRef, Timestamp, UpdateCheckRunOptions, WorkflowRunId,
};
use clap::{Args, Parser, Subcommand};
use github::{GitHubClientConfig, DEFAULT_API_URL};
use tracing::{debug, error};

use crate::telemetry::LogFormat;

/// Report CI results to GitHub as check runs.
///
/// Not `Debug`: it holds the API token.
#[derive(Parser)]
#[command(name = "ci-checks", version)]
pub struct Cli {
    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Token sent as a bearer credential.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository in `owner/name` form.
    #[arg(long, env = "GITHUB_REPOSITORY", value_parser = parse_repository)]
    pub repository: RepositoryRef,

    /// Workflow run id used to find an existing check run before creating one.
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,

    /// Log output format written to stderr.
    #[arg(long, env = "CI_CHECKS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the unified diff of a pull request to stdout.
    Diff {
        /// Pull request number.
        #[arg(long)]
        number: u64,
    },
    /// Create the check run for the current workflow run (or reuse an existing one)
    /// and print it as JSON.
    Create(CreateArgs),
    /// Update a check run and print the result as JSON.
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Title of the check run output.
    #[arg(long, requires = "summary")]
    pub title: Option<String>,

    /// Markdown summary of the check run output.
    #[arg(long, requires = "title")]
    pub summary: Option<String>,

    /// Markdown details of the check run output.
    #[arg(long, requires = "title")]
    pub text: Option<String>,
}

impl OutputArgs {
    fn into_output(self) -> Option<CheckRunOutput> {
        let (title, summary) = (self.title?, self.summary?);
        let mut output = CheckRunOutput::new(title, summary);
        output.text = self.text;
        Some(output)
    }
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Name of the check, e.g. `reviewdog`.
    #[arg(long)]
    pub name: String,

    /// Commit the check run reports on.
    #[arg(long, value_parser = parse_commit_sha)]
    pub head_sha: CommitSha,

    #[arg(long)]
    pub status: Option<CheckStatus>,

    #[arg(long)]
    pub conclusion: Option<CheckConclusion>,

    #[arg(long)]
    pub details_url: Option<String>,

    #[arg(long)]
    pub external_id: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl CreateArgs {
    /// Builds the request payload, stamping `started_at`/`completed_at` from
    /// the requested status.
    pub fn into_options(self, now: Timestamp) -> CreateCheckRunOptions {
        let mut options = CreateCheckRunOptions::new(self.name, self.head_sha);
        options.status = self.status;
        options.conclusion = self.conclusion;
        options.details_url = self.details_url;
        options.external_id = self.external_id;
        options.output = self.output.into_output();
        match self.status {
            Some(CheckStatus::InProgress) => options.started_at = Some(now),
            Some(CheckStatus::Completed) => options.completed_at = Some(now),
            _ => {}
        }
        options
    }
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Id of the check run to update.
    #[arg(long)]
    pub check_run_id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub status: Option<CheckStatus>,

    #[arg(long)]
    pub conclusion: Option<CheckConclusion>,

    #[arg(long)]
    pub details_url: Option<String>,

    #[arg(long)]
    pub external_id: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl UpdateArgs {
    /// Builds the request payload, stamping `completed_at` when the run completes.
    pub fn into_options(self, now: Timestamp) -> UpdateCheckRunOptions {
        UpdateCheckRunOptions {
            name: self.name,
            details_url: self.details_url,
            external_id: self.external_id,
            status: self.status,
            conclusion: self.conclusion,
            completed_at: (self.status == Some(CheckStatus::Completed)).then_some(now),
            output: self.output.into_output(),
            ..Default::default()
        }
    }
}

impl Cli {
    pub fn client_config(&self) -> GitHubClientConfig {
        let config = GitHubClientConfig::new(self.api_url.clone());
        match &self.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }

    /// The current workflow run, if `GITHUB_RUN_ID` (or `--run-id`) holds one.
    ///
    /// A malformed value is logged and treated as absent: the check run is
    /// then created without looking for an existing one.
    pub fn workflow_run_id(&self) -> Option<WorkflowRunId> {
        let raw = match self.run_id.as_deref() {
            Some(raw) => raw,
            None => {
                debug!("GITHUB_RUN_ID is not set");
                return None;
            }
        };
        let parsed = WorkflowRunId::parse(raw);
        if parsed.is_none() {
            error!(value = raw, "GITHUB_RUN_ID is not a valid workflow run id");
        }
        parsed
    }
}

fn parse_repository(value: &str) -> Result<RepositoryRef, String> {
    RepositoryRef::parse(value).ok_or_else(|| format!("expected 'owner/name', got '{value}'"))
}

fn parse_commit_sha(value: &str) -> Result<CommitSha, String> {
    CommitSha::new(value).ok_or_else(|| "commit SHA must not be empty".to_string())
}
