//! OAuth device flow for GitHub
//!
//! 1. `POST /login/device/code` hands out a user code and a device code
//! 2. the user enters the user code at github.com/login/device
//! 3. `POST /login/oauth/access_token` is polled until GitHub grants a token
//!
//! Polling runs at a fixed interval. The only adjustment is adopting the
//! interval GitHub asks for in a `slow_down` answer.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use super::ApiError;
use crate::config::Config;

/// Grant type for the token poll
pub const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Where users enter their code
pub const VERIFICATION_URL: &str = "https://github.com/login/device";

/// An access token; `Debug` never prints the secret
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for request headers and storage
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "AccessToken({prefix}…)")
    }
}

/// Answer to the device-code request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceCode {
    /// Secret code the device polls with
    pub device_code: String,
    /// Short code the user types in the browser
    pub user_code: String,
    /// Page where the code is entered
    #[serde(default = "default_verification_uri")]
    pub verification_uri: String,
    /// Seconds until both codes expire
    #[serde(default)]
    pub expires_in: u64,
    /// Minimum seconds between polls
    #[serde(default)]
    pub interval: u64,
}

fn default_verification_uri() -> String {
    VERIFICATION_URL.to_string()
}

/// Result of a single token poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The user has not entered the code yet
    Pending,
    /// Polling too fast; GitHub may name a new interval in seconds
    SlowDown {
        /// Interval requested by GitHub
        interval: Option<u64>,
    },
    /// Authorization completed
    Granted(AccessToken),
}

/// Device-flow failures
#[derive(Debug, Error)]
pub enum DeviceFlowError {
    /// The device code expired before the user authorized
    #[error("The sign-in code expired, please start again")]
    Expired,
    /// The user cancelled the authorization
    #[error("Authorization was denied")]
    Denied,
    /// Any other OAuth error code
    #[error("GitHub refused the sign-in ({code}): {description}")]
    Rejected {
        /// OAuth `error` value
        code: String,
        /// OAuth `error_description`, if any
        description: String,
    },
    /// A successful answer without a token in it
    #[error("No access token in GitHub's response")]
    MissingToken,
    /// HTTP or decoding failure
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw body of the token endpoint; success and error share one shape
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    interval: Option<u64>,
}

impl TokenResponse {
    fn into_outcome(self) -> Result<PollOutcome, DeviceFlowError> {
        if let Some(token) = self.access_token.filter(|t| !t.is_empty()) {
            return Ok(PollOutcome::Granted(AccessToken(token)));
        }

        match self.error.as_deref() {
            Some("authorization_pending") => Ok(PollOutcome::Pending),
            Some("slow_down") => Ok(PollOutcome::SlowDown {
                interval: self.interval,
            }),
            Some("expired_token") => Err(DeviceFlowError::Expired),
            Some("access_denied") => Err(DeviceFlowError::Denied),
            Some(code) => Err(DeviceFlowError::Rejected {
                code: code.to_string(),
                description: self.error_description.unwrap_or_default(),
            }),
            None => Err(DeviceFlowError::MissingToken),
        }
    }
}

/// Client for the device-flow endpoints
pub struct DeviceFlow {
    client: Client,
    base_url: String,
    client_id: String,
    scopes: String,
    poll_interval: Duration,
}

impl DeviceFlow {
    /// Device flow for the configured OAuth app
    pub fn from_config(config: &Config) -> Result<Self, DeviceFlowError> {
        Ok(Self::new(
            &config.oauth_base_url,
            &config.client_id,
            &config.scopes,
            &config.user_agent,
        )?
        .with_poll_interval(config.poll_interval()))
    }

    /// Device flow against an explicit OAuth host
    pub fn new(
        base_url: &str,
        client_id: &str,
        scopes: &str,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            scopes: scopes.to_string(),
            poll_interval: Duration::from_secs(5),
        })
    }

    /// Override the delay between polls
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn post_form(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .header("Accept", "application/json")
            .form(params)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }

    /// Step 1: ask GitHub for a device code and user code
    pub async fn request_device_code(&self) -> Result<DeviceCode, DeviceFlowError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("scope", self.scopes.as_str()),
        ];
        let body = self.post_form("/login/device/code", &params).await?;

        // GitHub reports a bad client id with 200 and an error body
        if let Ok(TokenResponse {
            error: Some(code),
            error_description,
            ..
        }) = serde_json::from_str::<TokenResponse>(&body)
        {
            return Err(DeviceFlowError::Rejected {
                code,
                description: error_description.unwrap_or_default(),
            });
        }

        let code: DeviceCode = serde_json::from_str(&body).map_err(ApiError::from)?;
        tracing::info!(
            "Received device code, user code {} expires in {}s",
            code.user_code,
            code.expires_in
        );
        Ok(code)
    }

    /// Step 2: poll once for the access token
    pub async fn poll_access_token(
        &self,
        device_code: &str,
    ) -> Result<PollOutcome, DeviceFlowError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("device_code", device_code),
            ("grant_type", GRANT_TYPE),
        ];
        let body = self.post_form("/login/oauth/access_token", &params).await?;
        let response: TokenResponse = serde_json::from_str(&body).map_err(ApiError::from)?;
        response.into_outcome()
    }

    /// Delay between polls for a given device code
    fn interval_for(&self, code: &DeviceCode) -> Duration {
        self.poll_interval.max(Duration::from_secs(code.interval))
    }

    /// Poll until the user authorizes, the code expires or GitHub refuses.
    /// `on_tick` sees every poll that did not end the flow.
    pub async fn wait_for_token(
        &self,
        code: &DeviceCode,
        mut on_tick: impl FnMut(&PollOutcome),
    ) -> Result<AccessToken, DeviceFlowError> {
        let mut interval = self.interval_for(code);
        let deadline = (code.expires_in > 0)
            .then(|| Instant::now() + Duration::from_secs(code.expires_in));

        loop {
            let outcome = self.poll_access_token(&code.device_code).await?;
            match &outcome {
                PollOutcome::Granted(token) => {
                    tracing::info!("Device flow authorized");
                    return Ok(token.clone());
                }
                PollOutcome::Pending => {
                    tracing::debug!("Authorization pending, next poll in {interval:?}");
                }
                PollOutcome::SlowDown { interval: requested } => {
                    if let Some(secs) = requested {
                        interval = interval.max(Duration::from_secs(*secs));
                    }
                    tracing::debug!("GitHub asked to slow down, polling every {interval:?}");
                }
            }
            on_tick(&outcome);

            if deadline.is_some_and(|d| Instant::now() + interval >= d) {
                return Err(DeviceFlowError::Expired);
            }
            tokio::time::sleep(interval).await;
        }
    }
}
