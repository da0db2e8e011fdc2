use serde::{Deserialize, Serialize};

use crate::types::Repository;

pub const DEFAULT_ISSUE_FILTER: &str = "is:open";

/// Free-text GitHub search qualifiers applied to the issue feed, e.g.
/// `is:open label:bug`. Always scoped to the configured repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFilter {
    pub text: String,
}

impl Default for IssueFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ISSUE_FILTER)
    }
}

impl IssueFilter {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Builds the `q` parameter for the issue search endpoint.
    pub fn search_query(&self, repo: &Repository) -> String {
        search_query(repo, Some(&self.text))
    }
}

pub fn search_query(repo: &Repository, filter: Option<&str>) -> String {
    match filter.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => format!("repo:{} {}", repo.full_name, text),
        None => format!("repo:{}", repo.full_name),
    }
}
