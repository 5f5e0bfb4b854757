//! Repositories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::Repo;

use super::parse_timestamp;

/// Repository list entry and detail header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric id
    pub id: u64,
    /// Short name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Owner login
    pub owner: String,
    /// Owner avatar URL
    pub owner_avatar_url: Option<String>,
    /// Private repository
    pub private: bool,
    /// `public`, `private` or `internal`
    pub visibility: String,
    /// Description text
    pub description: Option<String>,
    /// Main language
    pub language: Option<String>,
    /// Stargazers
    pub stars: u32,
    /// Forks
    pub forks: u32,
    /// Watchers
    pub watchers: u32,
    /// Open issues + pull requests
    pub open_issues: u32,
    /// Web page
    pub html_url: String,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Repo> for Repository {
    fn from(repo: Repo) -> Self {
        let visibility = repo.visibility.unwrap_or_else(|| {
            if repo.private { "private" } else { "public" }.to_string()
        });

        Self {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            owner: repo.owner.login,
            owner_avatar_url: repo.owner.avatar_url,
            private: repo.private,
            visibility,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            watchers: repo.watchers_count,
            open_issues: repo.open_issues_count,
            html_url: repo.html_url,
            created_at: parse_timestamp(repo.created_at.as_deref()),
            updated_at: parse_timestamp(repo.updated_at.as_deref()),
        }
    }
}

impl Repository {
    /// Description for display
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("No description")
    }

    /// Most recently updated first; unknown update times sink to the end
    pub fn sort_by_recent(repos: &mut [Self]) {
        repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }
}
