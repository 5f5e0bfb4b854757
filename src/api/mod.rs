//! GitHub REST API client
//!
//! Thin wrapper over `reqwest`: each call builds an authenticated request,
//! maps HTTP failures onto [`ApiError`] and converts the JSON payload into the
//! view models in [`crate::models`].

pub mod device;
pub mod types;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Config;
use crate::models::{Notification, Profile, RepoEvent, Repository};

pub use device::{AccessToken, DeviceCode, DeviceFlow, DeviceFlowError, PollOutcome};

/// GitHub REST API version pinned in every request
pub const API_VERSION: &str = "2022-11-28";

/// Errors from the REST client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The token was rejected; the user has to sign in again
    #[error("GitHub rejected the access token")]
    Unauthorized,
    /// The resource does not exist (or the token cannot see it)
    #[error("Not found: {0}")]
    NotFound(String),
    /// Any other non-success status
    #[error("GitHub returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// GitHub's `message`, or the raw body
        message: String,
    },
    /// No connection could be made
    #[error("Unable to reach GitHub: {0}")]
    Offline(#[source] reqwest::Error),
    /// Transport failure after the connection was made
    #[error("Request failed: {0}")]
    Http(#[source] reqwest::Error),
    /// The body was not the JSON we expected
    #[error("Unexpected response from GitHub: {0}")]
    Decode(#[from] serde_json::Error),
    /// A repository name that is not `owner/name`
    #[error("Invalid repository name '{0}', expected owner/name")]
    InvalidName(String),
    /// A notification thread id that is not a plain token
    #[error("Invalid notification id '{0}'")]
    InvalidId(String),
}

impl ApiError {
    /// Classify a transport error
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Offline(err)
        } else {
            Self::Http(err)
        }
    }

    /// Whether the user must sign in again
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether the failure is a connectivity problem
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Offline(_))
    }
}

/// Split and validate `owner/name`
fn split_full_name(full_name: &str) -> Result<(&str, &str), ApiError> {
    match full_name.trim().split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((owner, name))
        }
        _ => Err(ApiError::InvalidName(full_name.to_string())),
    }
}

/// Authenticated GitHub REST client
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: AccessToken,
}

impl GitHubClient {
    /// Create a client for the configured API host
    pub fn from_config(config: &Config, token: AccessToken) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, token, &config.user_agent)
    }

    /// Create a client for an explicit API base URL
    pub fn new(base_url: &str, token: AccessToken, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Build API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, self.api_url(endpoint))
            .bearer_auth(self.token.as_str())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();

        if status.is_success() || status == StatusCode::NOT_MODIFIED {
            return Ok(response);
        }

        tracing::debug!("{what}: GitHub answered {status}");
        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(what.to_string())),
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<types::ErrorBody>(&body)
                    .map_or(body, |e| e.message);
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        what: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, endpoint), what).await?;
        let body = response.text().await.map_err(ApiError::from_transport)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// The signed-in user's profile
    pub async fn user(&self) -> Result<Profile, ApiError> {
        let user: types::User = self.get_json("/user", "user").await?;
        Ok(user.into())
    }

    /// Notifications visible to the user (first page)
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let threads: Vec<types::NotificationThread> =
            self.get_json("/notifications", "notifications").await?;
        tracing::debug!("Fetched {} notifications", threads.len());
        Ok(threads.into_iter().map(Notification::from).collect())
    }

    /// Mark one notification thread as read
    pub async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError> {
        let id = id.trim();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ApiError::InvalidId(id.to_string()));
        }
        let endpoint = format!("/notifications/threads/{id}");
        self.send(
            self.request(Method::PATCH, &endpoint).body(""),
            "notification thread",
        )
        .await?;
        tracing::info!("Marked notification {id} as read");
        Ok(())
    }

    /// The user's repositories, most recently updated first
    pub async fn repositories(&self) -> Result<Vec<Repository>, ApiError> {
        let repos: Vec<types::Repo> = self.get_json("/user/repos", "repositories").await?;
        let mut repos: Vec<Repository> = repos.into_iter().map(Repository::from).collect();
        Repository::sort_by_recent(&mut repos);
        Ok(repos)
    }

    /// A single repository by `owner/name`
    pub async fn repository(&self, full_name: &str) -> Result<Repository, ApiError> {
        let (owner, name) = split_full_name(full_name)?;
        let repo: types::Repo = self
            .get_json(&format!("/repos/{owner}/{name}"), full_name)
            .await?;
        Ok(repo.into())
    }

    /// Recent public events of a repository (first page)
    pub async fn repo_events(&self, full_name: &str) -> Result<Vec<RepoEvent>, ApiError> {
        let (owner, name) = split_full_name(full_name)?;
        let events: Vec<types::Event> = self
            .get_json(&format!("/repos/{owner}/{name}/events"), full_name)
            .await?;
        Ok(events.into_iter().map(RepoEvent::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_full_name() {
        assert_eq!(split_full_name("octocat/hello").unwrap(), ("octocat", "hello"));
        assert_eq!(split_full_name(" rust-lang/rust ").unwrap(), ("rust-lang", "rust"));
        assert!(split_full_name("octocat").is_err());
        assert!(split_full_name("/hello").is_err());
        assert!(split_full_name("octocat/").is_err());
        assert!(split_full_name("a/b/c").is_err());
    }

    #[test]
    fn test_error_predicates() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::NotFound("x".into()).is_unauthorized());
        assert!(!ApiError::InvalidName("x".into()).is_offline());
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let token = AccessToken::new("t");
        let client = GitHubClient::new("http://localhost:1/", token, "hubwatch-test").unwrap();
        assert_eq!(client.api_url("/user"), "http://localhost:1/user");
    }
}
