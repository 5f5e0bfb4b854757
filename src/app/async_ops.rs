//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and async tasks.
//! The worker reads the token from the settings store for every command, so
//! a sign-out from any path is picked up by the next request.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{AccessToken, ApiError, DeviceCode, DeviceFlow, GitHubClient};
use crate::auth::SettingsStore;
use crate::config::Config;
use crate::models::{Notification, Profile, RepoEvent, Repository};
use crate::session::Session;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// Start the device flow
    SignIn,
    /// Abandon a running device flow
    CancelSignIn,
    /// Load the profile
    LoadProfile,
    /// Load notifications
    LoadNotifications,
    /// Mark one notification read, then reload the list
    MarkRead { id: String },
    /// Load the repository list
    LoadRepos,
    /// Load one repository and its events
    LoadRepo { full_name: String },
    /// Clear the stored token
    SignOut,
    /// Shutdown the worker
    Shutdown,
}

/// Which request a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Profile,
    Notifications,
    MarkRead,
    Repos,
    Repo,
}

/// Failure classes the UI reacts to differently
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Token rejected or missing; it has already been cleared
    Unauthorized(String),
    /// Could not reach GitHub
    Offline(String),
    /// Anything else
    Other(String),
}

impl Failure {
    fn from_api(err: &ApiError) -> Self {
        if err.is_unauthorized() {
            Self::Unauthorized(err.to_string())
        } else if err.is_offline() {
            Self::Offline(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }

    /// Human-readable detail
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m) | Self::Offline(m) | Self::Other(m) => m,
        }
    }
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    /// GitHub handed out a device code
    DeviceCode(DeviceCode),
    /// The device flow finished and the token is stored
    SignedIn(AccessToken),
    /// The device flow failed
    SignInFailed { message: String },
    /// Profile loaded
    Profile(Profile),
    /// Notifications loaded
    Notifications(Vec<Notification>),
    /// A notification was marked read
    MarkedRead { id: String },
    /// Repository list loaded
    Repos(Vec<Repository>),
    /// Repository detail loaded
    Repo {
        repo: Repository,
        events: Vec<RepoEvent>,
    },
    /// Token cleared
    SignedOut,
    /// A request failed
    Failed { request: Request, failure: Failure },
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

/// Spawn the async worker and return handles
pub fn spawn_worker(config: Config, store: SettingsStore) -> AsyncHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    tokio::spawn(async move {
        let worker = Worker {
            config,
            store,
            result_tx,
        };
        let mut sign_in_task: Option<JoinHandle<()>> = None;

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                AsyncCommand::Shutdown => break,
                AsyncCommand::SignIn => {
                    if let Some(task) = sign_in_task.take() {
                        task.abort();
                    }
                    sign_in_task = Some(worker.spawn_sign_in());
                }
                AsyncCommand::CancelSignIn => {
                    if let Some(task) = sign_in_task.take() {
                        task.abort();
                        tracing::info!("Sign-in cancelled");
                    }
                }
                AsyncCommand::LoadProfile => worker.load_profile().await,
                AsyncCommand::LoadNotifications => worker.load_notifications().await,
                AsyncCommand::MarkRead { id } => worker.mark_read(&id).await,
                AsyncCommand::LoadRepos => worker.load_repos().await,
                AsyncCommand::LoadRepo { full_name } => worker.load_repo(&full_name).await,
                AsyncCommand::SignOut => worker.sign_out().await,
            }
        }

        if let Some(task) = sign_in_task {
            task.abort();
        }
    });

    AsyncHandle { cmd_tx, result_rx }
}

struct Worker {
    config: Config,
    store: SettingsStore,
    result_tx: mpsc::Sender<AsyncResult>,
}

impl Worker {
    async fn send(&self, result: AsyncResult) {
        let _ = self.result_tx.send(result).await;
    }

    async fn fail(&self, request: Request, failure: Failure) {
        tracing::warn!("{request:?} failed: {}", failure.message());
        self.send(AsyncResult::Failed { request, failure }).await;
    }

    /// Client for the stored token
    fn client(&self) -> Result<GitHubClient, Failure> {
        let token = match self.store.get_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(Failure::Unauthorized("Not signed in".to_string())),
            Err(e) => return Err(Failure::Other(format!("{e:#}"))),
        };
        GitHubClient::from_config(&self.config, AccessToken::new(token))
            .map_err(|e| Failure::from_api(&e))
    }

    /// Classify an API error; a rejected token is cleared before reporting
    fn classify(&self, err: &ApiError) -> Failure {
        let failure = Failure::from_api(err);
        if matches!(failure, Failure::Unauthorized(_))
            && let Err(e) = self.store.clear_token()
        {
            tracing::warn!("Failed to clear rejected token: {e:#}");
        }
        failure
    }

    fn spawn_sign_in(&self) -> JoinHandle<()> {
        let config = self.config.clone();
        let store = self.store.clone();
        let result_tx = self.result_tx.clone();

        tokio::spawn(async move {
            let flow = match DeviceFlow::from_config(&config) {
                Ok(flow) => flow,
                Err(e) => {
                    let _ = result_tx
                        .send(AsyncResult::SignInFailed {
                            message: e.to_string(),
                        })
                        .await;
                    return;
                }
            };

            let code_tx = result_tx.clone();
            let mut session = Session::default();
            let result = session
                .sign_in(&flow, &store, |code| {
                    let _ = code_tx.try_send(AsyncResult::DeviceCode(code.clone()));
                })
                .await;

            let message = match result {
                Ok(token) => AsyncResult::SignedIn(token),
                Err(e) => AsyncResult::SignInFailed {
                    message: e.to_string(),
                },
            };
            let _ = result_tx.send(message).await;
        })
    }

    async fn load_profile(&self) {
        let client = match self.client() {
            Ok(c) => c,
            Err(f) => return self.fail(Request::Profile, f).await,
        };
        match client.user().await {
            Ok(profile) => self.send(AsyncResult::Profile(profile)).await,
            Err(e) => self.fail(Request::Profile, self.classify(&e)).await,
        }
    }

    async fn load_notifications(&self) {
        let client = match self.client() {
            Ok(c) => c,
            Err(f) => return self.fail(Request::Notifications, f).await,
        };
        match client.notifications().await {
            Ok(list) => self.send(AsyncResult::Notifications(list)).await,
            Err(e) => self.fail(Request::Notifications, self.classify(&e)).await,
        }
    }

    async fn mark_read(&self, id: &str) {
        let client = match self.client() {
            Ok(c) => c,
            Err(f) => return self.fail(Request::MarkRead, f).await,
        };
        if let Err(e) = client.mark_notification_read(id).await {
            return self.fail(Request::MarkRead, self.classify(&e)).await;
        }
        self.send(AsyncResult::MarkedRead { id: id.to_string() })
            .await;

        // the list is re-fetched so the unread count reflects GitHub's view
        match client.notifications().await {
            Ok(list) => self.send(AsyncResult::Notifications(list)).await,
            Err(e) => self.fail(Request::Notifications, self.classify(&e)).await,
        }
    }

    async fn load_repos(&self) {
        let client = match self.client() {
            Ok(c) => c,
            Err(f) => return self.fail(Request::Repos, f).await,
        };
        match client.repositories().await {
            Ok(repos) => self.send(AsyncResult::Repos(repos)).await,
            Err(e) => self.fail(Request::Repos, self.classify(&e)).await,
        }
    }

    async fn load_repo(&self, full_name: &str) {
        let client = match self.client() {
            Ok(c) => c,
            Err(f) => return self.fail(Request::Repo, f).await,
        };
        let (repo, events) =
            tokio::join!(client.repository(full_name), client.repo_events(full_name));
        match (repo, events) {
            (Ok(repo), Ok(events)) => self.send(AsyncResult::Repo { repo, events }).await,
            (Err(e), _) | (_, Err(e)) => self.fail(Request::Repo, self.classify(&e)).await,
        }
    }

    async fn sign_out(&self) {
        match self.store.clear_token() {
            Ok(()) => {
                tracing::info!("Signed out");
                self.send(AsyncResult::SignedOut).await;
            }
            Err(e) => {
                self.fail(Request::Profile, Failure::Other(format!("{e:#}")))
                    .await;
            }
        }
    }
}
