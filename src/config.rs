use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::filters::DEFAULT_ISSUE_FILTER;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub github: GitHubConfig,
    pub default_issue_filter: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            default_issue_filter: DEFAULT_ISSUE_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub api_base_url: String,
    pub user_agent: String,
    /// Request timeout. `None` leaves the HTTP client's default in place.
    pub timeout_seconds: Option<u64>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            user_agent: "github-feed/0.1.0".to_string(),
            timeout_seconds: None,
        }
    }
}

impl GitHubConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
