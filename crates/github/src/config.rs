//! Connection settings for [`crate::GitHubRestClient`].

use std::time::Duration;

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How to reach a GitHub-compatible REST API.
///
/// `api_url` may point at GitHub Enterprise Server (`https://host/api/v3`) or
/// at a local mock server in tests.
#[derive(Clone)]
pub struct GitHubClientConfig {
    pub api_url: String,
    /// Sent as `Authorization: Bearer <token>`. Requests are anonymous when unset.
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl GitHubClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            user_agent: concat!("ci-checks/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// The token must never reach logs.
impl std::fmt::Debug for GitHubClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
