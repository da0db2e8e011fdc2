//! Display helpers for rendering records in a dashboard.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::{AuthorAssociation, CommitRecord, IssueRecord, IssueState};

pub const COMMIT_SHA_LEN: usize = 6;

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar/";

impl CommitRecord {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..COMMIT_SHA_LEN).unwrap_or(&self.sha)
    }

    /// Link that browses the repository at this commit.
    pub fn tree_url(&self) -> String {
        self.html_url.replacen("/commit/", "/tree/", 1)
    }

    /// GitHub avatar of the author, or a Gravatar derived from the commit
    /// email when the commit is not linked to a GitHub account.
    pub fn avatar_url(&self) -> String {
        match &self.author_avatar_url {
            Some(url) => url.clone(),
            None => gravatar_url(&self.author_email),
        }
    }

    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn byline(&self) -> String {
        format!(
            "{} committed on {}",
            self.author_name,
            self.author_date.format("%B %d, %Y")
        )
    }
}

pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("{}{}", GRAVATAR_BASE, hex::encode(digest))
}

/// Icon shown next to an issue, picked from who opened it and its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueBadge {
    OpenIssue,
    ClosedIssue,
    OpenRequest,
    MergedRequest,
    ClosedRequest,
}

impl IssueRecord {
    pub fn badge(&self) -> Option<IssueBadge> {
        let closed = self.state == IssueState::Closed;
        match self.author_association {
            AuthorAssociation::Owner if closed => Some(IssueBadge::ClosedIssue),
            AuthorAssociation::Owner => Some(IssueBadge::OpenIssue),
            AuthorAssociation::Contributor if closed => Some(IssueBadge::MergedRequest),
            AuthorAssociation::Contributor => Some(IssueBadge::OpenRequest),
            AuthorAssociation::None if closed => Some(IssueBadge::ClosedRequest),
            AuthorAssociation::None => Some(IssueBadge::OpenRequest),
            AuthorAssociation::Other(_) => None,
        }
    }

    pub fn byline(&self) -> String {
        format!("#{} by {}", self.number, self.author_login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn commit() -> CommitRecord {
        CommitRecord {
            sha: "a1b2c3d4e5f6".to_string(),
            message: "Add widget\n\nLonger description".to_string(),
            author_name: "Jane Doe".to_string(),
            author_email: " Jane@Example.com ".to_string(),
            author_date: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            author_avatar_url: None,
            html_url: "https://github.com/acme/widgets/commit/a1b2c3d4e5f6".to_string(),
        }
    }

    fn issue(association: AuthorAssociation, state: IssueState) -> IssueRecord {
        IssueRecord {
            number: 12,
            title: "Broken".to_string(),
            html_url: "https://github.com/acme/widgets/issues/12".to_string(),
            state,
            author_login: "octocat".to_string(),
            author_html_url: "https://github.com/octocat".to_string(),
            author_association: association,
        }
    }

    #[test]
    fn test_commit_links() {
        let commit = commit();
        assert_eq!(commit.short_sha(), "a1b2c3");
        assert_eq!(
            commit.tree_url(),
            "https://github.com/acme/widgets/tree/a1b2c3d4e5f6"
        );
        assert_eq!(commit.summary(), "Add widget");
        assert_eq!(commit.byline(), "Jane Doe committed on March 05, 2024");
    }

    #[test]
    fn test_short_sha_of_short_value() {
        let mut commit = commit();
        commit.sha = "abc".to_string();
        assert_eq!(commit.short_sha(), "abc");
    }

    #[test]
    fn test_avatar_falls_back_to_gravatar() {
        let mut commit = commit();
        let gravatar = commit.avatar_url();
        assert!(gravatar.starts_with(GRAVATAR_BASE));
        assert_eq!(gravatar, gravatar_url("jane@example.com"));
        assert_eq!(gravatar.len(), GRAVATAR_BASE.len() + 64);

        commit.author_avatar_url = Some("https://avatars.example/u/1".to_string());
        assert_eq!(commit.avatar_url(), "https://avatars.example/u/1");
    }

    #[test]
    fn test_issue_badges() {
        use AuthorAssociation as A;
        use IssueState::{Closed, Open};

        assert_eq!(issue(A::Owner, Open).badge(), Some(IssueBadge::OpenIssue));
        assert_eq!(issue(A::Owner, Closed).badge(), Some(IssueBadge::ClosedIssue));
        assert_eq!(issue(A::Contributor, Open).badge(), Some(IssueBadge::OpenRequest));
        assert_eq!(
            issue(A::Contributor, Closed).badge(),
            Some(IssueBadge::MergedRequest)
        );
        assert_eq!(issue(A::None, Open).badge(), Some(IssueBadge::OpenRequest));
        assert_eq!(issue(A::None, Closed).badge(), Some(IssueBadge::ClosedRequest));
        assert_eq!(issue(A::Other("MEMBER".into()), Open).badge(), None);
        assert_eq!(issue(A::Owner, Open).byline(), "#12 by octocat");
    }
}
