//! Signed-in user's profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::User;

use super::parse_timestamp;

/// Profile card data for the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Numeric user id
    pub id: u64,
    /// Login handle (without `@`)
    pub login: String,
    /// Display name, falls back to the login
    pub name: String,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Bio text
    pub bio: Option<String>,
    /// Number of public repositories
    pub public_repos: u32,
    /// Follower count
    pub followers: u32,
    /// Following count
    pub following: u32,
    /// Public profile page
    pub profile_url: String,
    /// Account creation time
    pub joined_at: Option<DateTime<Utc>>,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        let name = user
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| user.login.clone());
        let profile_url = user
            .html_url
            .unwrap_or_else(|| format!("https://github.com/{}", user.login));

        Self {
            id: user.id,
            name,
            avatar_url: user.avatar_url,
            bio: user.bio.filter(|b| !b.trim().is_empty()),
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            profile_url,
            joined_at: parse_timestamp(user.created_at.as_deref()),
            login: user.login,
        }
    }
}

impl Profile {
    /// `@login`
    pub fn handle(&self) -> String {
        format!("@{}", self.login)
    }

    /// "Joined: March 2020", or "Joined: ?" when the date is unknown
    pub fn joined_label(&self) -> String {
        let since = self
            .joined_at
            .map_or_else(|| "?".to_string(), |dt| dt.format("%B %Y").to_string());
        format!("Joined: {since}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> User {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_user() {
        let profile: Profile = user(
            r#"{"id":1,"login":"octocat","name":"The Octocat","avatar_url":"https://a/1",
                "bio":"","public_repos":8,"followers":42,"following":3,
                "html_url":"https://github.com/octocat","created_at":"2011-01-25T18:44:36Z"}"#,
        )
        .into();

        assert_eq!(profile.name, "The Octocat");
        assert_eq!(profile.handle(), "@octocat");
        assert_eq!(profile.bio, None);
        assert_eq!(profile.public_repos, 8);
        assert_eq!(profile.followers, 42);
        assert_eq!(profile.joined_label(), "Joined: January 2011");
    }

    #[test]
    fn test_sparse_user_falls_back() {
        let profile: Profile = user(r#"{"id":2,"login":"ghost","name":null}"#).into();
        assert_eq!(profile.name, "ghost");
        assert_eq!(profile.profile_url, "https://github.com/ghost");
        assert_eq!(profile.followers, 0);
        assert_eq!(profile.joined_label(), "Joined: ?");
    }

    #[test]
    fn test_unparseable_join_date() {
        let profile: Profile =
            user(r#"{"id":3,"login":"x","created_at":"sometime in 2020"}"#).into();
        assert_eq!(profile.joined_label(), "Joined: ?");
    }
}
