pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod filters;
pub mod host;
pub mod pagination;
pub mod present;
pub mod settings;
pub mod types;
pub mod widget;

pub use client::{FetchedPage, GitHubClient, RateLimitStatus};
pub use config::{FetchConfig, GitHubConfig};
pub use error::{GitHubFeedError, Result};
pub use feed::{CommitFeed, FeedLoader, FeedPhase, FeedSource, FeedState, IssueFeed};
pub use filters::{search_query, IssueFilter, DEFAULT_ISSUE_FILTER};
pub use host::{DashboardHost, JsonFileHost, MemoryHost};
pub use pagination::parse_last_page;
pub use present::{gravatar_url, IssueBadge, COMMIT_SHA_LEN};
pub use settings::{CancelOutcome, ConfigDraft, ConfigurationManager, WidgetMode};
pub use types::{
    AuthorAssociation, CommitRecord, Configuration, FeedKind, IssueRecord, IssueState, Repository,
};
pub use widget::{FeedView, GitHubFeedWidget, WidgetView};

pub struct GitHubFeedWidgetBuilder {
    config: FetchConfig,
}

impl GitHubFeedWidgetBuilder {
    pub fn new() -> Self {
        Self {
            config: FetchConfig::default(),
        }
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.github.api_base_url = url.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.github.user_agent = agent.into();
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.github.timeout_seconds = Some(seconds);
        self
    }

    pub fn default_issue_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.default_issue_filter = filter.into();
        self
    }

    pub fn build<H: DashboardHost>(self, host: H) -> Result<GitHubFeedWidget<H>> {
        GitHubFeedWidget::with_config(host, self.config)
    }
}

impl Default for GitHubFeedWidgetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
