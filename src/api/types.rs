//! Wire types for the GitHub REST API
//!
//! Only the fields hubwatch displays are modelled. Anything GitHub may omit or
//! null out is an `Option` or has a serde default, so a trimmed payload still
//! decodes.

#![allow(missing_docs)]

use serde::Deserialize;

/// `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
}

/// One entry of `GET /notifications`
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationThread {
    pub id: String,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub reason: String,
    pub updated_at: String,
    pub last_read_at: Option<String>,
    pub subject: Subject,
    pub repository: NotificationRepository,
    #[serde(default)]
    pub url: String,
}

/// What a notification is about
#[derive(Debug, Clone, Deserialize)]
pub struct Subject {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
}

/// Repository reference embedded in a notification
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRepository {
    pub full_name: String,
    pub html_url: Option<String>,
}

/// `GET /user/repos` entry and `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub html_url: String,
    pub description: Option<String>,
    pub owner: Owner,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub language: Option<String>,
    pub visibility: Option<String>,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
}

/// Repository owner
#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

/// `GET /repos/{owner}/{repo}/events` entry
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub actor: Actor,
    pub payload: Option<Payload>,
    #[serde(default)]
    pub public: bool,
    pub created_at: Option<String>,
}

/// Who triggered an event
#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub id: u64,
    pub login: String,
    pub display_login: Option<String>,
    pub avatar_url: Option<String>,
}

/// Event payload; shape depends on the event type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    pub action: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub head: Option<String>,
    pub before: Option<String>,
    pub size: Option<u32>,
    pub distinct_size: Option<u32>,
    pub commits: Option<Vec<Commit>>,
    pub pull_request: Option<PullRequest>,
}

/// Commit inside a push payload
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub author: CommitAuthor,
    pub message: String,
    #[serde(default)]
    pub distinct: bool,
    pub url: Option<String>,
}

/// Git author of a commit
#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
}

/// Pull request inside a pull-request payload
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub id: u64,
    pub number: u32,
    pub state: Option<String>,
    pub title: Option<String>,
    pub user: Option<UserRef>,
    pub merged_at: Option<String>,
    pub html_url: Option<String>,
    pub head: Option<GitRef>,
    pub base: Option<GitRef>,
}

/// Minimal user reference
#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
}

/// Branch reference of a pull request
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
}

/// Error body GitHub sends with non-2xx API responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
