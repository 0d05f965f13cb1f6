//! [`CheckRunApi`] over the GitHub REST API, using `octocrab` as the HTTP layer.
//!
//! `octocrab` owns authentication, the base URI and connection handling. The
//! requests go through its raw `_get_with_headers`/`_post`/`_patch` methods
//! rather than the typed handlers: the typed handlers parse a non-2xx body into
//! `octocrab::GitHubError` and drop the raw text, which the update path must
//! log on every failed attempt.

use async_trait::async_trait;
use bytes::Bytes;
use checks::{
    CheckRun, CheckRunApi, CheckRunId, CheckRunList, CheckSuiteId, CreateCheckRunOptions,
    GitHubError, ListCheckRunsOptions, PullRequestDiff, PullRequestNumber, RepositoryRef,
    UpdateCheckRunOptions, WorkflowRun, WorkflowRunId,
};
use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use http::StatusCode;
use http_body_util::combinators::BoxBody;
use http_body_util::BodyExt;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use url::form_urlencoded;

use crate::GitHubClientConfig;

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

type RawResponse = http::Response<BoxBody<Bytes, octocrab::Error>>;

/// GitHub REST client.
///
/// Each [`CheckRunApi`] method issues exactly one request. Non-2xx responses
/// become [`GitHubError::Api`] carrying the raw body so callers can log it.
#[derive(Clone)]
pub struct GitHubRestClient {
    crab: Octocrab,
    api_url: String,
}

impl GitHubRestClient {
    pub fn new(config: &GitHubClientConfig) -> Result<Self, GitHubError> {
        let api_url = config.api_url.trim_end_matches('/');
        if !(api_url.starts_with("https://") || api_url.starts_with("http://")) {
            return Err(GitHubError::Configuration {
                message: format!("API URL must be http(s), got '{}'", config.api_url),
            });
        }

        // Retries belong to the checker, which owns the attempt budget.
        let mut builder = Octocrab::builder()
            .base_uri(api_url)
            .map_err(|e| GitHubError::Configuration {
                message: format!("invalid API URL '{api_url}': {e}"),
            })?
            .add_header(USER_AGENT, config.user_agent.clone())
            .add_header(
                HeaderName::from_static(API_VERSION_HEADER),
                API_VERSION.to_string(),
            )
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(config.timeout))
            .set_read_timeout(Some(config.timeout));
        if let Some(token) = &config.token {
            builder = builder.personal_token(token.clone());
        }
        let crab = builder.build().map_err(|e| GitHubError::Configuration {
            message: format!("failed to build GitHub client: {e}"),
        })?;

        Ok(Self {
            crab,
            api_url: api_url.to_string(),
        })
    }

    /// Base URL every request route is resolved against.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn repo_route(repo: &RepositoryRef, rest: &str) -> String {
        format!("/repos/{}/{}/{}", repo.owner, repo.name, rest)
    }

    async fn get(&self, route: String, accept: &'static str) -> Result<Vec<u8>, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        let response = self
            .crab
            ._get_with_headers(route, Some(headers))
            .await
            .map_err(transport)?;
        success_body(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, route: String) -> Result<T, GitHubError> {
        decode(&self.get(route, JSON_MEDIA_TYPE).await?)
    }

    async fn post_json<B, T>(&self, route: String, body: &B) -> Result<T, GitHubError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .crab
            ._post(route, Some(body))
            .await
            .map_err(transport)?;
        decode(&success_body(response).await?)
    }

    async fn patch_json<B, T>(&self, route: String, body: &B) -> Result<T, GitHubError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .crab
            ._patch(route, Some(body))
            .await
            .map_err(transport)?;
        decode(&success_body(response).await?)
    }
}

#[async_trait]
impl CheckRunApi for GitHubRestClient {
    #[instrument(skip_all, fields(repo = %repo, number = %number))]
    async fn get_pull_request_raw_diff(
        &self,
        repo: &RepositoryRef,
        number: PullRequestNumber,
    ) -> Result<PullRequestDiff, GitHubError> {
        let route = Self::repo_route(repo, &format!("pulls/{number}"));
        let body = self.get(route, DIFF_MEDIA_TYPE).await?;
        debug!(bytes = body.len(), "Fetched pull request diff");
        Ok(PullRequestDiff::new(body))
    }

    #[instrument(skip_all, fields(repo = %repo, run_id = %run_id))]
    async fn get_workflow_run(
        &self,
        repo: &RepositoryRef,
        run_id: WorkflowRunId,
    ) -> Result<WorkflowRun, GitHubError> {
        let route = Self::repo_route(repo, &format!("actions/runs/{run_id}"));
        self.get_json(route).await
    }

    #[instrument(skip_all, fields(repo = %repo, suite_id = %suite_id))]
    async fn list_check_runs_for_suite(
        &self,
        repo: &RepositoryRef,
        suite_id: CheckSuiteId,
        options: &ListCheckRunsOptions,
    ) -> Result<CheckRunList, GitHubError> {
        let mut route = Self::repo_route(repo, &format!("check-suites/{suite_id}/check-runs"));
        let query = query_string(options)?;
        if !query.is_empty() {
            route.push('?');
            route.push_str(&query);
        }
        let list: CheckRunList = self.get_json(route).await?;
        debug!(total_count = list.total_count, "Listed check runs for check suite");
        Ok(list)
    }

    #[instrument(skip_all, fields(repo = %repo, name = %options.name))]
    async fn create_check_run(
        &self,
        repo: &RepositoryRef,
        options: &CreateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError> {
        let route = Self::repo_route(repo, "check-runs");
        let run: CheckRun = self.post_json(route, options).await?;
        debug!(check_run_id = %run.id, "Created check run");
        Ok(run)
    }

    #[instrument(skip_all, fields(repo = %repo, check_run_id = %check_run_id))]
    async fn update_check_run(
        &self,
        repo: &RepositoryRef,
        check_run_id: CheckRunId,
        options: &UpdateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError> {
        let route = Self::repo_route(repo, &format!("check-runs/{check_run_id}"));
        self.patch_json(route, options).await
    }
}

/// Returns the body of a 2xx response, or [`GitHubError::Api`] for any other status.
async fn success_body(response: RawResponse) -> Result<Vec<u8>, GitHubError> {
    let status = response.status();
    if status.is_success() {
        let body = response.into_body().collect().await.map_err(transport)?;
        return Ok(body.to_bytes().to_vec());
    }

    let body = match response.into_body().collect().await {
        Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
        Err(err) => {
            error!(error = %err, status = status.as_u16(), "Failed to read error response body");
            String::new()
        }
    };
    Err(api_error(status, body))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GitHubError> {
    serde_json::from_slice(body).map_err(|e| GitHubError::Decode {
        message: e.to_string(),
    })
}

/// Encodes the top-level fields of `params` as `application/x-www-form-urlencoded`.
fn query_string<T: Serialize>(params: &T) -> Result<String, GitHubError> {
    let value = serde_json::to_value(params).map_err(|e| GitHubError::Configuration {
        message: format!("failed to encode query parameters: {e}"),
    })?;
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let serde_json::Value::Object(fields) = value {
        for (key, value) in fields {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(text) => {
                    query.append_pair(&key, &text);
                }
                other => {
                    query.append_pair(&key, &other.to_string());
                }
            }
        }
    }
    Ok(query.finish())
}

fn transport(err: octocrab::Error) -> GitHubError {
    GitHubError::Transport {
        message: err.to_string(),
    }
}

/// GitHub error bodies look like `{"message": "...", "documentation_url": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn api_error(status: StatusCode, body: String) -> GitHubError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    GitHubError::Api {
        status: status.as_u16(),
        message,
        body,
    }
}
