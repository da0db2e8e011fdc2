use log::{debug, info, warn};
use octocrab::Octocrab;
use reqwest::header::{HeaderValue, ACCEPT, LINK};
use serde::{Deserialize, Serialize};

use crate::config::GitHubConfig;
use crate::error::{GitHubFeedError, Result};
use crate::feed::FeedSource;
use crate::pagination::parse_last_page;
use crate::types::Configuration;

/// One page of records plus the `last` page number reported by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage<T> {
    pub items: Vec<T>,
    pub last_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub core_limit: u64,
    pub core_remaining: u64,
    pub search_limit: u64,
    pub search_remaining: u64,
    /// Unix timestamp at which the core quota resets.
    pub core_reset: u64,
}

pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_config(GitHubConfig::default())
    }

    pub fn with_config(config: GitHubConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder.build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Requests a single page of `source` for the configured repository.
    ///
    /// Transport failures, non-success statuses and undecodable bodies are
    /// errors; an absent or unparsable `Link` header is not.
    pub async fn fetch_page<S: FeedSource>(
        &self,
        source: &S,
        configuration: &Configuration,
        filter: Option<&str>,
        page: u32,
    ) -> Result<FetchedPage<S::Record>> {
        let repo = configuration.repository();
        let url = format!("{}{}", self.config.base_url(), source.path(&repo));
        let query = source.query(&repo, filter, page);

        debug!("Fetching {} page {} for {}", S::KIND, page, repo.full_name);

        let mut request = self
            .http
            .get(&url)
            .query(&query)
            .header(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(token) = configuration.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(
                "GitHub returned {} for {} page {} of {}",
                status, S::KIND, page, repo.full_name
            );
            return Err(GitHubFeedError::FeedRequestFailed {
                feed: S::KIND,
                status: status.as_u16(),
            });
        }

        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await?;
        let items = source.unwrap_records(&body)?;
        let last_page = parse_last_page(link.as_deref());

        debug!(
            "Fetched {} {} from page {} (last page {})",
            items.len(),
            S::KIND,
            page,
            last_page
        );

        Ok(FetchedPage { items, last_page })
    }

    fn octocrab(&self, token: Option<&str>) -> Result<Octocrab> {
        let mut builder = Octocrab::builder();

        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }

        if !self.config.api_base_url.is_empty()
            && self.config.api_base_url != "https://api.github.com"
        {
            builder = builder
                .base_uri(self.config.base_url())
                .map_err(|e| GitHubFeedError::ConfigError(format!("Invalid base URI: {}", e)))?;
        }

        Ok(builder.build()?)
    }

    pub async fn test_connection(&self, token: Option<&str>) -> Result<()> {
        debug!("Testing GitHub API connection");

        self.octocrab(token)?
            .ratelimit()
            .get()
            .await
            .map_err(|e| GitHubFeedError::ConfigError(format!("Connection test failed: {}", e)))?;

        info!("GitHub API connection successful");
        Ok(())
    }

    /// Remaining request quota. Anonymous callers share a small per-IP budget,
    /// search requests have their own.
    pub async fn rate_limit(&self, token: Option<&str>) -> Result<RateLimitStatus> {
        let rate_limit = self.octocrab(token)?.ratelimit().get().await?;

        Ok(RateLimitStatus {
            core_limit: rate_limit.resources.core.limit as u64,
            core_remaining: rate_limit.resources.core.remaining as u64,
            search_limit: rate_limit.resources.search.limit as u64,
            search_remaining: rate_limit.resources.search.remaining as u64,
            core_reset: rate_limit.resources.core.reset as u64,
        })
    }
}
