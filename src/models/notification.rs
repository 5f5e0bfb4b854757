//! Notification threads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::NotificationThread;

use super::{parse_timestamp, timestamp_label};

/// A notification as shown in the inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Thread id, used to mark it read
    pub id: String,
    /// Subject title (issue / PR / release name)
    pub title: String,
    /// Subject type, e.g. `PullRequest`
    pub kind: String,
    /// Repository `owner/name`
    pub repository: String,
    /// Why the user got it (`mention`, `review_requested`, ...)
    pub reason: String,
    /// Still unread
    pub unread: bool,
    /// Last update
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<NotificationThread> for Notification {
    fn from(thread: NotificationThread) -> Self {
        Self {
            id: thread.id,
            title: thread.subject.title,
            kind: thread.subject.kind,
            repository: thread.repository.full_name,
            reason: thread.reason.replace('_', " "),
            unread: thread.unread,
            updated_at: parse_timestamp(Some(&thread.updated_at)),
        }
    }
}

impl Notification {
    /// "Updated: 2024-03-01 12:30:05"
    pub fn updated_label(&self) -> String {
        format!("Updated: {}", timestamp_label(self.updated_at))
    }

    /// Web page of the repository the notification belongs to
    pub fn repository_url(&self) -> String {
        format!("https://github.com/{}", self.repository)
    }

    /// Number of unread notifications in a list
    pub fn unread_count(list: &[Self]) -> usize {
        list.iter().filter(|n| n.unread).count()
    }
}
