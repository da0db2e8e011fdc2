use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GitHubFeedError, Result};

/// The two independently paginated data sources shown by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Commits,
    Issues,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Commits => f.write_str("commits"),
            FeedKind::Issues => f.write_str("issues"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub full_name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let full_name = format!("{}/{}", owner, name);
        Self {
            owner,
            name,
            full_name,
        }
    }

    /// Parses `scheme://host/owner/project`.
    ///
    /// The URL must split on `/` into exactly five segments; a trailing slash
    /// or any extra path component is rejected rather than trimmed.
    pub fn from_url(url: &str) -> Result<Self> {
        let parts: Vec<&str> = url.split('/').collect();

        if parts.len() != 5 {
            return Err(GitHubFeedError::InvalidRepositoryUrl(format!(
                "expected scheme://host/owner/project, got: {}",
                url
            )));
        }

        let owner = parts[3].trim();
        let name = parts[4].trim();
        if owner.is_empty() || name.is_empty() {
            return Err(GitHubFeedError::InvalidRepositoryUrl(format!(
                "missing owner or project in: {}",
                url
            )));
        }

        Ok(Self::new(owner, name))
    }
}

/// Repository settings persisted by the dashboard host.
///
/// Field names on the wire match what the host already stores for existing
/// widgets.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "repoUrl")]
    pub repository_url: String,
    #[serde(rename = "userName")]
    pub owner_name: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("repository_url", &self.repository_url)
            .field("owner_name", &self.owner_name)
            .field("project_id", &self.project_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Configuration {
    /// Validates `repository_url` and derives owner and project from it.
    /// Blank tokens are treated as absent.
    pub fn from_url(repository_url: &str, access_token: Option<String>) -> Result<Self> {
        let repo = Repository::from_url(repository_url)?;
        Ok(Self {
            repository_url: repository_url.to_string(),
            owner_name: repo.owner,
            project_id: repo.name,
            access_token: access_token.filter(|token| !token.trim().is_empty()),
        })
    }

    pub fn repository(&self) -> Repository {
        Repository::new(&self.owner_name, &self.project_id)
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub author_date: DateTime<Utc>,
    pub author_avatar_url: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// How the issue author relates to the repository, as reported by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthorAssociation {
    Owner,
    Contributor,
    None,
    Other(String),
}

impl From<String> for AuthorAssociation {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OWNER" => Self::Owner,
            "CONTRIBUTOR" => Self::Contributor,
            "NONE" => Self::None,
            _ => Self::Other(value),
        }
    }
}

impl From<AuthorAssociation> for String {
    fn from(value: AuthorAssociation) -> Self {
        match value {
            AuthorAssociation::Owner => "OWNER".to_string(),
            AuthorAssociation::Contributor => "CONTRIBUTOR".to_string(),
            AuthorAssociation::None => "NONE".to_string(),
            AuthorAssociation::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: IssueState,
    pub author_login: String,
    pub author_html_url: String,
    pub author_association: AuthorAssociation,
}

/// Raw shapes of the REST payloads, converted into the records above.
pub(crate) mod api {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    use super::{AuthorAssociation, CommitRecord, IssueRecord, IssueState};

    #[derive(Debug, Deserialize)]
    pub struct Commit {
        pub sha: String,
        pub html_url: String,
        pub commit: CommitDetail,
        pub author: Option<Account>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CommitDetail {
        pub message: String,
        pub author: Option<Signature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Signature {
        pub name: String,
        pub email: String,
        pub date: DateTime<Utc>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Account {
        pub login: Option<String>,
        pub html_url: Option<String>,
        pub avatar_url: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Issue {
        pub number: u64,
        pub title: String,
        pub html_url: String,
        pub state: IssueState,
        pub user: Account,
        pub author_association: AuthorAssociation,
    }

    #[derive(Debug, Deserialize)]
    pub struct IssueSearch {
        #[serde(default)]
        pub items: Vec<Issue>,
    }

    impl From<Commit> for CommitRecord {
        fn from(raw: Commit) -> Self {
            let (author_name, author_email, author_date) = match raw.commit.author {
                Some(signature) => (signature.name, signature.email, signature.date),
                None => (String::new(), String::new(), DateTime::<Utc>::default()),
            };

            CommitRecord {
                sha: raw.sha,
                message: raw.commit.message,
                author_name,
                author_email,
                author_date,
                author_avatar_url: raw.author.and_then(|account| account.avatar_url),
                html_url: raw.html_url,
            }
        }
    }

    impl From<Issue> for IssueRecord {
        fn from(raw: Issue) -> Self {
            IssueRecord {
                number: raw.number,
                title: raw.title,
                html_url: raw.html_url,
                state: raw.state,
                author_login: raw.user.login.unwrap_or_else(|| "unknown".to_string()),
                author_html_url: raw.user.html_url.unwrap_or_default(),
                author_association: raw.author_association,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_from_url() {
        let repo = Repository::from_url("https://github.com/acme/widgets").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.full_name, "acme/widgets");
    }

    #[test]
    fn test_repository_from_url_rejects_wrong_segment_count() {
        for url in [
            "",
            "acme/widgets",
            "https://github.com/acme",
            "https://github.com/acme/widgets/",
            "https://github.com/acme/widgets/tree/main",
            "github.com/acme/widgets",
        ] {
            let err = Repository::from_url(url).unwrap_err();
            assert!(
                matches!(err, GitHubFeedError::InvalidRepositoryUrl(_)),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_repository_from_url_rejects_empty_segments() {
        assert!(Repository::from_url("https://github.com//widgets").is_err());
        assert!(Repository::from_url("https://github.com/acme/").is_err());
    }

    #[test]
    fn test_configuration_wire_names() {
        let config =
            Configuration::from_url("https://github.com/acme/widgets", Some("secret".into()))
                .unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["repoUrl"], "https://github.com/acme/widgets");
        assert_eq!(json["userName"], "acme");
        assert_eq!(json["projectId"], "widgets");
        assert_eq!(json["apiKey"], "secret");

        let parsed: Configuration = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_configuration_blank_token_is_absent() {
        let config =
            Configuration::from_url("https://github.com/acme/widgets", Some("  ".into())).unwrap();
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_configuration_debug_redacts_token() {
        let config =
            Configuration::from_url("https://github.com/acme/widgets", Some("ghp_abc".into()))
                .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ghp_abc"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_author_association_parsing() {
        let parsed: Vec<AuthorAssociation> =
            serde_json::from_str(r#"["OWNER", "CONTRIBUTOR", "NONE", "MEMBER"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                AuthorAssociation::Owner,
                AuthorAssociation::Contributor,
                AuthorAssociation::None,
                AuthorAssociation::Other("MEMBER".to_string()),
            ]
        );
    }

    #[test]
    fn test_commit_conversion_without_github_account() {
        let raw: api::Commit = serde_json::from_str(
            r#"{
                "sha": "0123456789abcdef",
                "html_url": "https://github.com/acme/widgets/commit/0123456789abcdef",
                "commit": {
                    "message": "Fix the frobnicator",
                    "author": {
                        "name": "Jane Doe",
                        "email": "jane@example.com",
                        "date": "2024-03-05T10:00:00Z"
                    }
                },
                "author": null
            }"#,
        )
        .unwrap();

        let record = CommitRecord::from(raw);
        assert_eq!(record.author_name, "Jane Doe");
        assert_eq!(record.author_avatar_url, None);
        assert_eq!(record.author_date.to_rfc3339(), "2024-03-05T10:00:00+00:00");
    }

    #[test]
    fn test_issue_conversion() {
        let raw: api::Issue = serde_json::from_str(
            r#"{
                "number": 42,
                "title": "Widget explodes",
                "html_url": "https://github.com/acme/widgets/issues/42",
                "state": "closed",
                "user": {"login": "octocat", "html_url": "https://github.com/octocat"},
                "author_association": "CONTRIBUTOR"
            }"#,
        )
        .unwrap();

        let record = IssueRecord::from(raw);
        assert_eq!(record.number, 42);
        assert_eq!(record.state, IssueState::Closed);
        assert_eq!(record.author_login, "octocat");
        assert_eq!(record.author_association, AuthorAssociation::Contributor);
    }
}
