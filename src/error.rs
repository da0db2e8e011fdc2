use thiserror::Error;

use crate::types::FeedKind;

#[derive(Error, Debug)]
pub enum GitHubFeedError {
    #[error("Incorrect GitHub repository URL: {0}")]
    InvalidRepositoryUrl(String),

    #[error("Failed fetching {feed} from GitHub: HTTP {status}")]
    FeedRequestFailed { feed: FeedKind, status: u16 },

    #[error("No more {0} pages to load")]
    NoMorePages(FeedKind),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Octocrab error: {0}")]
    OctocrabError(#[from] octocrab::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dashboard host error: {0}")]
    HostError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl GitHubFeedError {
    /// True for the errors a feed surfaces as "failed fetching data":
    /// transport failures, non-success statuses and undecodable bodies.
    pub fn is_feed_failure(&self) -> bool {
        matches!(
            self,
            Self::FeedRequestFailed { .. } | Self::NetworkError(_) | Self::JsonError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GitHubFeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_failure_classification() {
        let status = GitHubFeedError::FeedRequestFailed {
            feed: FeedKind::Commits,
            status: 404,
        };
        assert!(status.is_feed_failure());
        assert_eq!(
            status.to_string(),
            "Failed fetching commits from GitHub: HTTP 404"
        );

        let invalid = GitHubFeedError::InvalidRepositoryUrl("nope".to_string());
        assert!(!invalid.is_feed_failure());
        assert!(!GitHubFeedError::NoMorePages(FeedKind::Issues).is_feed_failure());
    }
}
