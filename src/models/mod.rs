//! View models built from GitHub API payloads

mod event;
mod notification;
mod profile;
mod repository;

pub use event::{CommitSummary, PullRequestSummary, RepoEvent};
pub use notification::Notification;
pub use profile::Profile;
pub use repository::Repository;

use chrono::{DateTime, Utc};

/// Parse a GitHub timestamp (`2020-05-06T15:51:29Z`)
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Relative time string (e.g., "5m", "2h", "3d")
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(at);

    if duration.num_seconds() < 60 {
        format!("{}s", duration.num_seconds().max(0))
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d", duration.num_days())
    } else {
        at.format("%b %d").to_string()
    }
}

/// Full timestamp for detail lines (`2024-03-01 12:30:05`), `?` when unknown
pub fn timestamp_label(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "?".to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
