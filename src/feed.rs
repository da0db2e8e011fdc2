//! Paginated feeds of commits and issues.
//!
//! Each feed owns a [`FeedState`] that only changes through explicit
//! transitions, so the `Idle -> Loading -> {Loaded, Failed}` lifecycle can be
//! exercised without a network. [`FeedLoader`] pairs that state with a
//! [`FeedSource`] and drives it through [`GitHubClient`].

use log::{debug, info, warn};
use serde::Serialize;

use crate::client::{FetchedPage, GitHubClient};
use crate::error::{GitHubFeedError, Result};
use crate::filters::search_query;
use crate::types::{api, CommitRecord, Configuration, FeedKind, IssueRecord, Repository};

/// Endpoint and payload shape of one feed kind.
pub trait FeedSource {
    type Record;

    const KIND: FeedKind;

    /// Path below the API base URL, starting with `/`.
    fn path(&self, repo: &Repository) -> String;

    fn query(
        &self,
        repo: &Repository,
        filter: Option<&str>,
        page: u32,
    ) -> Vec<(&'static str, String)>;

    fn unwrap_records(&self, body: &[u8]) -> Result<Vec<Self::Record>>;
}

/// Commit history of the default branch. The payload is a bare JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitFeed;

impl FeedSource for CommitFeed {
    type Record = CommitRecord;

    const KIND: FeedKind = FeedKind::Commits;

    fn path(&self, repo: &Repository) -> String {
        format!("/repos/{}/{}/commits", repo.owner, repo.name)
    }

    fn query(
        &self,
        _repo: &Repository,
        _filter: Option<&str>,
        page: u32,
    ) -> Vec<(&'static str, String)> {
        vec![("page", page.to_string())]
    }

    fn unwrap_records(&self, body: &[u8]) -> Result<Vec<CommitRecord>> {
        let commits: Vec<api::Commit> = serde_json::from_slice(body)?;
        Ok(commits.into_iter().map(CommitRecord::from).collect())
    }
}

/// Issue search scoped to the repository. The payload wraps results in `items`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueFeed;

impl FeedSource for IssueFeed {
    type Record = IssueRecord;

    const KIND: FeedKind = FeedKind::Issues;

    fn path(&self, _repo: &Repository) -> String {
        "/search/issues".to_string()
    }

    fn query(
        &self,
        repo: &Repository,
        filter: Option<&str>,
        page: u32,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("q", search_query(repo, filter)),
            ("page", page.to_string()),
        ]
    }

    fn unwrap_records(&self, body: &[u8]) -> Result<Vec<IssueRecord>> {
        let search: api::IssueSearch = serde_json::from_slice(body)?;
        Ok(search.items.into_iter().map(IssueRecord::from).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Records of one feed plus its pagination counters.
///
/// `page_index` counts pages loaded so far (1 after the first success);
/// `total_pages` is the `last` page reported by the API, 0 when unknown.
#[derive(Debug, Clone, Serialize)]
pub struct FeedState<T> {
    items: Vec<T>,
    page_index: u32,
    total_pages: u32,
    phase: FeedPhase,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page_index: 0,
            total_pages: 0,
            phase: FeedPhase::Idle,
        }
    }
}

impl<T> FeedState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FeedPhase::Loading
    }

    pub fn has_failed(&self) -> bool {
        self.phase == FeedPhase::Failed
    }

    pub fn has_more(&self) -> bool {
        self.page_index < self.total_pages
    }

    /// Whether a "load more" request may be issued right now.
    pub fn can_load_more(&self) -> bool {
        self.phase == FeedPhase::Loaded && self.has_more()
    }

    /// True once a first page has arrived and until the next reset.
    pub fn has_data(&self) -> bool {
        self.page_index > 0
    }

    /// Drops all records and counters and enters `Loading`. Valid from any
    /// phase.
    pub fn begin_first_page(&mut self) {
        self.items.clear();
        self.page_index = 0;
        self.total_pages = 0;
        self.phase = FeedPhase::Loading;
    }

    pub fn complete_first_page(&mut self, page: FetchedPage<T>) {
        self.items = page.items;
        self.page_index = 1;
        self.total_pages = page.last_page;
        self.phase = FeedPhase::Loaded;
    }

    pub fn fail_first_page(&mut self) {
        self.items.clear();
        self.phase = FeedPhase::Failed;
    }

    /// Enters `Loading` for the next page and returns the page number to
    /// request. Only allowed from `Loaded` while more pages remain.
    pub fn begin_next_page(&mut self, kind: FeedKind) -> Result<u32> {
        if !self.can_load_more() {
            return Err(GitHubFeedError::NoMorePages(kind));
        }
        self.phase = FeedPhase::Loading;
        Ok(self.page_index + 1)
    }

    /// Appends in arrival order; records are never reordered or deduplicated.
    /// The `last` page stays the one reported with the first page.
    pub fn complete_next_page(&mut self, page: FetchedPage<T>) {
        self.items.extend(page.items);
        self.page_index += 1;
        self.phase = FeedPhase::Loaded;
    }

    pub fn fail_next_page(&mut self) {
        self.phase = FeedPhase::Failed;
    }
}

pub struct FeedLoader<S: FeedSource> {
    source: S,
    state: FeedState<S::Record>,
}

impl<S: FeedSource + Default> Default for FeedLoader<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: FeedSource> FeedLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: FeedState::new(),
        }
    }

    pub fn state(&self) -> &FeedState<S::Record> {
        &self.state
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// Replaces the feed with its first page. On failure the record list is
    /// left empty and the feed is `Failed`; the error is returned as well.
    pub async fn fetch_first_page(
        &mut self,
        client: &GitHubClient,
        configuration: &Configuration,
        filter: Option<&str>,
    ) -> Result<()> {
        self.state.begin_first_page();

        match client
            .fetch_page(&self.source, configuration, filter, 0)
            .await
        {
            Ok(page) => {
                info!(
                    "Loaded {} {} for {}/{} ({} pages)",
                    page.items.len(),
                    S::KIND,
                    configuration.owner_name,
                    configuration.project_id,
                    page.last_page
                );
                self.state.complete_first_page(page);
                Ok(())
            }
            Err(e) => {
                warn!("Failed fetching {}: {}", S::KIND, e);
                self.state.fail_first_page();
                Err(e)
            }
        }
    }

    /// Appends the next page. Refused with `NoMorePages` unless the feed is
    /// loaded and `has_more()`; on failure previously loaded records stay.
    pub async fn fetch_next_page(
        &mut self,
        client: &GitHubClient,
        configuration: &Configuration,
        filter: Option<&str>,
    ) -> Result<()> {
        let page_number = self.state.begin_next_page(S::KIND)?;

        match client
            .fetch_page(&self.source, configuration, filter, page_number)
            .await
        {
            Ok(page) => {
                debug!("Appending {} {} from page {}", page.items.len(), S::KIND, page_number);
                self.state.complete_next_page(page);
                Ok(())
            }
            Err(e) => {
                warn!("Failed fetching {} page {}: {}", S::KIND, page_number, e);
                self.state.fail_next_page();
                Err(e)
            }
        }
    }
}

impl FeedLoader<IssueFeed> {
    /// Discards loaded issues and reloads the first page with `filter`.
    pub async fn apply_filter(
        &mut self,
        client: &GitHubClient,
        configuration: &Configuration,
        filter: &str,
    ) -> Result<()> {
        info!("Applying issue filter '{}'", filter);
        self.fetch_first_page(client, configuration, Some(filter))
            .await
    }
}
