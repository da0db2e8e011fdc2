use log::{debug, info, warn};
use serde::Serialize;

use crate::client::{GitHubClient, RateLimitStatus};
use crate::config::FetchConfig;
use crate::error::{GitHubFeedError, Result};
use crate::feed::{CommitFeed, FeedLoader, FeedState, IssueFeed};
use crate::filters::IssueFilter;
use crate::host::DashboardHost;
use crate::settings::{CancelOutcome, ConfigDraft, ConfigurationManager, WidgetMode};
use crate::types::{CommitRecord, Configuration, FeedKind, IssueRecord};

const FALLBACK_TITLE: &str = "GitHub commits";

/// Which list the data view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FeedView {
    #[default]
    Commits,
    Issues,
}

/// What the presentation layer should draw right now.
#[derive(Debug)]
pub enum WidgetView<'a> {
    Setup {
        draft: &'a ConfigDraft,
        error: Option<&'a str>,
    },
    Loading,
    Failed,
    Commits {
        feed: &'a FeedState<CommitRecord>,
    },
    Issues {
        filter: &'a str,
        feed: &'a FeedState<IssueRecord>,
    },
}

/// A repository widget embedded in a dashboard host.
///
/// The host forwards its lifecycle to [`initialize`](Self::initialize),
/// [`configure`](Self::configure) and [`refresh`](Self::refresh); user actions
/// map onto the remaining methods. All state lives here and is only mutated
/// through `&mut self`, so one feed never has two requests in flight.
pub struct GitHubFeedWidget<H: DashboardHost> {
    host: H,
    client: GitHubClient,
    settings: ConfigurationManager,
    commits: FeedLoader<CommitFeed>,
    issues: FeedLoader<IssueFeed>,
    default_filter: String,
    issue_filter: IssueFilter,
    active_view: FeedView,
}

impl<H: DashboardHost> GitHubFeedWidget<H> {
    pub fn new(host: H) -> Result<Self> {
        Self::with_config(host, FetchConfig::default())
    }

    pub fn with_config(host: H, config: FetchConfig) -> Result<Self> {
        let client = GitHubClient::with_config(config.github)?;

        Ok(Self {
            host,
            client,
            settings: ConfigurationManager::new(),
            commits: FeedLoader::default(),
            issues: FeedLoader::default(),
            issue_filter: IssueFilter::new(config.default_issue_filter.clone()),
            default_filter: config.default_issue_filter,
            active_view: FeedView::Commits,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn settings(&self) -> &ConfigurationManager {
        &self.settings
    }

    pub fn mode(&self) -> WidgetMode {
        self.settings.mode()
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        self.settings.active()
    }

    pub fn commits(&self) -> &FeedState<CommitRecord> {
        self.commits.state()
    }

    pub fn issues(&self) -> &FeedState<IssueRecord> {
        self.issues.state()
    }

    pub fn issue_filter(&self) -> &str {
        &self.issue_filter.text
    }

    pub fn active_view(&self) -> FeedView {
        self.active_view
    }

    /// `Project: <id>`, or the generic label while nothing is configured or
    /// the stored configuration carries no project id. URLs saved through
    /// the setup form always have one.
    pub fn title(&self) -> String {
        match self.settings.active() {
            Some(config) if !config.project_id.is_empty() => {
                format!("Project: {}", config.project_id)
            }
            _ => FALLBACK_TITLE.to_string(),
        }
    }

    /// Loads the stored configuration and, when there is one, both feeds.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.settings.load_configuration(&mut self.host)?.is_some() {
            self.reset_view();
            self.refresh().await;
        }
        Ok(())
    }

    /// Host "configure" entry point: back to the setup form.
    pub fn configure(&mut self) {
        self.settings.request_reconfigure(&mut self.host);
    }

    /// Host "refresh" entry point: reloads the first page of both feeds.
    ///
    /// Feed failures are recorded in feed state, not returned.
    pub async fn refresh(&mut self) {
        let Some(config) = self.settings.active().cloned() else {
            debug!("Refresh requested before the widget was configured");
            return;
        };

        self.update_title();

        let Self {
            client,
            commits,
            issues,
            issue_filter,
            ..
        } = self;
        let client = &*client;

        let (commit_result, issue_result) = tokio::join!(
            commits.fetch_first_page(client, &config, None),
            issues.fetch_first_page(client, &config, Some(issue_filter.text.as_str())),
        );

        if commit_result.is_err() || issue_result.is_err() {
            warn!(
                "Refresh of {}/{} finished with failures",
                config.owner_name, config.project_id
            );
        }
    }

    pub fn set_draft_url(&mut self, repository_url: impl Into<String>) {
        self.settings.set_draft_url(repository_url);
    }

    pub fn set_draft_token(&mut self, access_token: impl Into<String>) {
        self.settings.set_draft_token(access_token);
    }

    /// Validates and persists new settings, then reloads both feeds. An
    /// invalid URL is returned and leaves the widget on the setup form.
    pub async fn save(&mut self, repository_url: &str, access_token: Option<String>) -> Result<()> {
        self.settings
            .validate_and_save(&mut self.host, repository_url, access_token)?;
        self.refresh().await;
        Ok(())
    }

    pub async fn save_draft(&mut self) -> Result<()> {
        self.settings.save_draft(&mut self.host)?;
        self.refresh().await;
        Ok(())
    }

    pub async fn cancel(&mut self) -> Result<CancelOutcome> {
        let outcome = self.settings.cancel(&mut self.host)?;
        if let CancelOutcome::Restored(_) = &outcome {
            self.reset_view();
            self.refresh().await;
        }
        Ok(outcome)
    }

    pub fn select_view(&mut self, view: FeedView) {
        self.active_view = view;
    }

    /// Edits the filter text without reloading; see
    /// [`apply_issue_filter`](Self::apply_issue_filter).
    ///
    /// [`load_more_issues`](Self::load_more_issues) requests the next page
    /// with this text even before it is applied, so an unapplied edit can
    /// append results of a different query to the loaded list.
    pub fn set_issue_filter(&mut self, text: impl Into<String>) {
        self.issue_filter = IssueFilter::new(text);
    }

    pub async fn apply_issue_filter(&mut self) -> Result<()> {
        let config = self.require_configuration()?;
        self.update_title();
        self.issues
            .apply_filter(&self.client, &config, &self.issue_filter.text)
            .await
    }

    /// Appends the next commit page. Only valid while
    /// `commits().can_load_more()`.
    pub async fn load_more_commits(&mut self) -> Result<()> {
        let config = self.require_configuration()?;
        self.commits
            .fetch_next_page(&self.client, &config, None)
            .await
    }

    /// Appends the next issue page using the current filter text.
    pub async fn load_more_issues(&mut self) -> Result<()> {
        let config = self.require_configuration()?;
        self.issues
            .fetch_next_page(&self.client, &config, Some(self.issue_filter.text.as_str()))
            .await
    }

    pub async fn load_more(&mut self, feed: FeedKind) -> Result<()> {
        match feed {
            FeedKind::Commits => self.load_more_commits().await,
            FeedKind::Issues => self.load_more_issues().await,
        }
    }

    pub async fn rate_limit(&self) -> Result<RateLimitStatus> {
        let token = self.settings.active().and_then(Configuration::token);
        self.client.rate_limit(token).await
    }

    pub fn view(&self) -> WidgetView<'_> {
        if self.settings.mode() == WidgetMode::Setup {
            return WidgetView::Setup {
                draft: self.settings.draft(),
                error: self.settings.error(),
            };
        }

        if self.commits.state().has_data() {
            return match self.active_view {
                FeedView::Commits => WidgetView::Commits {
                    feed: self.commits.state(),
                },
                FeedView::Issues => WidgetView::Issues {
                    filter: &self.issue_filter.text,
                    feed: self.issues.state(),
                },
            };
        }

        if self.commits.state().has_failed() || self.issues.state().has_failed() {
            WidgetView::Failed
        } else {
            WidgetView::Loading
        }
    }

    fn require_configuration(&self) -> Result<Configuration> {
        self.settings.active().cloned().ok_or_else(|| {
            GitHubFeedError::ConfigError("Widget has no repository configured".to_string())
        })
    }

    fn update_title(&mut self) {
        let title = self.title();
        info!("Widget title: {}", title);
        self.host.set_title(&title);
    }

    fn reset_view(&mut self) {
        self.issue_filter = IssueFilter::new(self.default_filter.clone());
        self.active_view = FeedView::Commits;
    }
}
