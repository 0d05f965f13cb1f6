//! In-memory test doubles for the port traits.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    CheckRun, CheckRunApi, CheckRunId, CheckRunList, CheckSuiteId, CheckSuiteRef, CommitSha,
    CreateCheckRunOptions, GitHubError, ListCheckRunsOptions, PullRequestDiff,
    PullRequestNumber, RepositoryRef, Sleeper, UpdateCheckRunOptions, WorkflowRun,
    WorkflowRunId,
};

/// A call observed by [`FakeCheckRunApi`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetDiff(PullRequestNumber),
    GetWorkflowRun(WorkflowRunId),
    ListCheckRuns(CheckSuiteId),
    Create(String),
    Update(CheckRunId),
}

/// Scripted [`CheckRunApi`]. Each operation returns its next queued result;
/// an empty queue yields a transport error so unexpected calls fail loudly.
#[derive(Default)]
pub(crate) struct FakeCheckRunApi {
    diffs: Mutex<VecDeque<Result<PullRequestDiff, GitHubError>>>,
    workflow_runs: Mutex<VecDeque<Result<WorkflowRun, GitHubError>>>,
    check_run_lists: Mutex<VecDeque<Result<CheckRunList, GitHubError>>>,
    creates: Mutex<VecDeque<Result<CheckRun, GitHubError>>>,
    updates: Mutex<VecDeque<Result<CheckRun, GitHubError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCheckRunApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_diff(&self, result: Result<PullRequestDiff, GitHubError>) {
        self.diffs.lock().expect("lock").push_back(result);
    }

    pub fn push_workflow_run(&self, result: Result<WorkflowRun, GitHubError>) {
        self.workflow_runs.lock().expect("lock").push_back(result);
    }

    pub fn push_check_run_list(&self, result: Result<CheckRunList, GitHubError>) {
        self.check_run_lists.lock().expect("lock").push_back(result);
    }

    pub fn push_create(&self, result: Result<CheckRun, GitHubError>) {
        self.creates.lock().expect("lock").push_back(result);
    }

    pub fn push_update(&self, result: Result<CheckRun, GitHubError>) {
        self.updates.lock().expect("lock").push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("lock").push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, GitHubError>>>, what: &str) -> Result<T, GitHubError> {
    queue
        .lock()
        .expect("lock")
        .pop_front()
        .unwrap_or_else(|| {
            Err(GitHubError::Transport {
                message: format!("unscripted {what} call"),
            })
        })
}

#[async_trait]
impl CheckRunApi for FakeCheckRunApi {
    async fn get_pull_request_raw_diff(
        &self,
        _repo: &RepositoryRef,
        number: PullRequestNumber,
    ) -> Result<PullRequestDiff, GitHubError> {
        self.record(Call::GetDiff(number));
        next(&self.diffs, "get_pull_request_raw_diff")
    }

    async fn get_workflow_run(
        &self,
        _repo: &RepositoryRef,
        run_id: WorkflowRunId,
    ) -> Result<WorkflowRun, GitHubError> {
        self.record(Call::GetWorkflowRun(run_id));
        next(&self.workflow_runs, "get_workflow_run")
    }

    async fn list_check_runs_for_suite(
        &self,
        _repo: &RepositoryRef,
        suite_id: CheckSuiteId,
        _options: &ListCheckRunsOptions,
    ) -> Result<CheckRunList, GitHubError> {
        self.record(Call::ListCheckRuns(suite_id));
        next(&self.check_run_lists, "list_check_runs_for_suite")
    }

    async fn create_check_run(
        &self,
        _repo: &RepositoryRef,
        options: &CreateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError> {
        self.record(Call::Create(options.name.clone()));
        next(&self.creates, "create_check_run")
    }

    async fn update_check_run(
        &self,
        _repo: &RepositoryRef,
        check_run_id: CheckRunId,
        _options: &UpdateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError> {
        self.record(Call::Update(check_run_id));
        next(&self.updates, "update_check_run")
    }
}

/// [`Sleeper`] that records requested delays and returns immediately.
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("lock").push(duration);
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub(crate) fn repo() -> RepositoryRef {
    RepositoryRef::new("reviewdog", "reviewdog").expect("valid repository")
}

pub(crate) fn sha() -> CommitSha {
    CommitSha::new("ce587453ced02b1526dfb4cb910479d431683101").expect("non-empty sha")
}

pub(crate) fn check_run(id: u64) -> CheckRun {
    CheckRun {
        id: CheckRunId::new(id),
        name: "reviewdog".to_string(),
        head_sha: sha(),
        status: None,
        conclusion: None,
        external_id: None,
        details_url: None,
        html_url: None,
        started_at: None,
        completed_at: None,
        output: None,
        check_suite: Some(CheckSuiteRef {
            id: CheckSuiteId::new(42),
        }),
    }
}

pub(crate) fn workflow_run(id: u64, suite: Option<u64>) -> WorkflowRun {
    WorkflowRun {
        id: WorkflowRunId::new(id),
        check_suite_id: suite.map(CheckSuiteId::new),
        head_sha: Some(sha()),
        status: Some("in_progress".to_string()),
        conclusion: None,
    }
}

pub(crate) fn unauthorized() -> GitHubError {
    GitHubError::Api {
        status: 401,
        message: "Bad credentials".to_string(),
        body: r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#
            .to_string(),
    }
}
