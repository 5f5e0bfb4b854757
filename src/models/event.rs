//! Repository activity events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::{Event, Payload};

use super::{parse_timestamp, timestamp_label};

/// One commit of a push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Git author name
    pub author: String,
    /// Full commit message
    pub message: String,
}

impl CommitSummary {
    /// First line of the message
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// Pull request attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    /// PR number
    pub number: u32,
    /// Title
    pub title: String,
    /// `open` / `closed`
    pub state: String,
    /// Author login
    pub author: Option<String>,
    /// Source branch
    pub head: Option<String>,
    /// Target branch
    pub base: Option<String>,
    /// Merged (has a merge time)
    pub merged: bool,
}

impl PullRequestSummary {
    /// "PR #12: Add thing"
    pub fn heading(&self) -> String {
        format!("PR #{}: {}", self.number, self.title)
    }

    /// "feature → main", `None` when either side is unknown
    pub fn branches(&self) -> Option<String> {
        match (&self.head, &self.base) {
            (Some(head), Some(base)) => Some(format!("{head} → {base}")),
            _ => None,
        }
    }
}

/// A repository event for the detail screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEvent {
    /// Event id
    pub id: String,
    /// GitHub event type, e.g. `PushEvent`
    pub kind: String,
    /// Who triggered it
    pub actor: String,
    /// When it happened
    pub created_at: Option<DateTime<Utc>>,
    /// Branch name for ref-carrying events
    pub branch: Option<String>,
    /// Commits of a push
    pub commits: Vec<CommitSummary>,
    /// Pull request of a PR event
    pub pull_request: Option<PullRequestSummary>,
}

/// Strip `refs/heads/` and drop values GitHub uses as placeholders
fn branch_name(git_ref: Option<&str>) -> Option<String> {
    let name = git_ref?.trim();
    let name = name.strip_prefix("refs/heads/").unwrap_or(name);
    if name.is_empty() || name.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(name.to_string())
    }
}

impl From<Event> for RepoEvent {
    fn from(event: Event) -> Self {
        let payload = event.payload.unwrap_or_default();
        let Payload {
            git_ref,
            commits,
            pull_request,
            ..
        } = payload;

        let commits = commits
            .unwrap_or_default()
            .into_iter()
            .map(|c| CommitSummary {
                author: c.author.name,
                message: c.message,
            })
            .collect();

        let pull_request = pull_request.map(|pr| PullRequestSummary {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            state: pr.state.unwrap_or_else(|| "unknown".to_string()),
            author: pr.user.map(|u| u.login),
            head: pr.head.map(|r| r.name),
            base: pr.base.map(|r| r.name),
            merged: pr.merged_at.is_some(),
        });

        Self {
            id: event.id,
            kind: event.kind.unwrap_or_else(|| "Event".to_string()),
            actor: event.actor.display_login.unwrap_or(event.actor.login),
            created_at: parse_timestamp(event.created_at.as_deref()),
            branch: branch_name(git_ref.as_deref()),
            commits,
            pull_request,
        }
    }
}

impl RepoEvent {
    /// Whether there is anything to show beyond the summary line
    pub fn is_expandable(&self) -> bool {
        !self.commits.is_empty() || self.pull_request.is_some()
    }

    /// Event type without the `Event` suffix ("Push", "PullRequest")
    pub fn display_kind(&self) -> &str {
        match self.kind.strip_suffix("Event") {
            Some(short) if !short.is_empty() => short,
            _ => &self.kind,
        }
    }

    /// Creation time as `YYYY-MM-DD HH:MM:SS`
    pub fn created_label(&self) -> String {
        timestamp_label(self.created_at)
    }

    /// Lines shown when the event is expanded
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for commit in &self.commits {
            lines.push(format!("Commit by {}", commit.author));
            lines.push(format!("  {}", commit.headline()));
        }
        if let Some(pr) = &self.pull_request {
            lines.push(pr.heading());
            if let Some(branches) = pr.branches() {
                let verb = if pr.merged { "Merged" } else { "Branches" };
                lines.push(format!("{verb}: {branches}"));
            }
            lines.push(format!("State: {}", pr.state));
            if let Some(author) = &pr.author {
                lines.push(format!("Created by: {author}"));
            }
        }
        lines
    }
}
