//! Sign-in session
//!
//! Drives the device flow through its states and keeps the settings store in
//! step with them: a token is written before the session reports itself
//! signed in, and cleared when the user signs out.

use anyhow::{Context, Result, anyhow};

use crate::api::{AccessToken, DeviceCode, DeviceFlow};
use crate::auth::SettingsStore;

/// Where the user is in the sign-in flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SignInState {
    /// No token stored
    #[default]
    SignedOut,
    /// Waiting for GitHub to hand out a device code
    RequestingCode,
    /// The user has to enter `code.user_code` in the browser
    AwaitingAuthorization {
        /// Codes returned by GitHub
        code: DeviceCode,
    },
    /// A token is stored and usable
    SignedIn {
        /// The stored token
        token: AccessToken,
    },
    /// The last attempt failed; the user may start again
    Failed {
        /// What went wrong
        message: String,
    },
}

/// Inputs to the sign-in state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInEvent {
    /// The user asked to sign in
    Begin,
    /// GitHub returned the device code
    CodeReceived(DeviceCode),
    /// The token was granted and persisted
    Granted(AccessToken),
    /// Any failure along the way
    Failed(String),
    /// The user signed out
    SignOut,
}

impl SignInState {
    /// Next state, or `None` when `event` is not valid here
    pub fn next(&self, event: SignInEvent) -> Option<Self> {
        use SignInEvent as E;
        match (self, event) {
            (Self::SignedOut | Self::Failed { .. }, E::Begin) => Some(Self::RequestingCode),
            (Self::RequestingCode, E::CodeReceived(code)) => {
                Some(Self::AwaitingAuthorization { code })
            }
            (Self::AwaitingAuthorization { .. }, E::Granted(token)) => {
                Some(Self::SignedIn { token })
            }
            (Self::RequestingCode | Self::AwaitingAuthorization { .. }, E::Failed(message)) => {
                Some(Self::Failed { message })
            }
            (Self::SignedIn { .. }, E::SignOut) => Some(Self::SignedOut),
            _ => None,
        }
    }

    /// Whether a usable token is held
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    /// Whether a device flow is underway
    pub const fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::RequestingCode | Self::AwaitingAuthorization { .. }
        )
    }
}

/// Sign-in state bound to the settings store
#[derive(Debug, Default)]
pub struct Session {
    state: SignInState,
}

impl Session {
    /// Session from the stored token. An empty token, or a store that
    /// cannot be decrypted (e.g. after the machine id changed), counts as
    /// signed out.
    pub fn restore(store: &SettingsStore) -> Result<Self> {
        let state = match store.get_token() {
            Ok(Some(token)) => {
                tracing::debug!("Restored stored access token");
                SignInState::SignedIn {
                    token: AccessToken::new(token),
                }
            }
            Ok(None) => SignInState::SignedOut,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings store: {e:#}");
                SignInState::SignedOut
            }
        };
        Ok(Self { state })
    }

    /// Current state
    pub const fn state(&self) -> &SignInState {
        &self.state
    }

    /// Token, when signed in
    pub const fn token(&self) -> Option<&AccessToken> {
        match &self.state {
            SignInState::SignedIn { token } => Some(token),
            _ => None,
        }
    }

    fn apply(&mut self, event: SignInEvent) -> Result<()> {
        let next = self
            .state
            .next(event.clone())
            .ok_or_else(|| anyhow!("Cannot apply {event:?} while {:?}", self.state))?;
        self.state = next;
        Ok(())
    }

    /// Run the whole device flow: request a code, hand it to `on_code`, poll
    /// until GitHub answers, then persist the token.
    pub async fn sign_in(
        &mut self,
        flow: &DeviceFlow,
        store: &SettingsStore,
        on_code: impl FnOnce(&DeviceCode),
    ) -> Result<AccessToken> {
        self.apply(SignInEvent::Begin)?;

        let code = match flow.request_device_code().await {
            Ok(code) => code,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.apply(SignInEvent::CodeReceived(code.clone()))?;
        on_code(&code);

        let token = match flow.wait_for_token(&code, |_| {}).await {
            Ok(token) => token,
            Err(e) => return Err(self.fail(e.into())),
        };

        if let Err(e) = store
            .store_token(token.as_str())
            .context("Failed to save access token")
        {
            return Err(self.fail(e));
        }
        self.apply(SignInEvent::Granted(token.clone()))?;
        tracing::info!("Signed in");
        Ok(token)
    }

    fn fail(&mut self, err: anyhow::Error) -> anyhow::Error {
        tracing::warn!("Sign-in failed: {err:#}");
        self.state = self
            .state
            .next(SignInEvent::Failed(err.to_string()))
            .unwrap_or_else(|| SignInState::Failed {
                message: err.to_string(),
            });
        err
    }

    /// Clear the stored token and return to signed out
    pub fn sign_out(&mut self, store: &SettingsStore) -> Result<()> {
        store.clear_token().context("Failed to clear access token")?;
        self.state = SignInState::SignedOut;
        tracing::info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn code() -> DeviceCode {
        DeviceCode {
            device_code: "dev".into(),
            user_code: "WDJB-MJHT".into(),
            verification_uri: crate::api::device::VERIFICATION_URL.into(),
            expires_in: 900,
            interval: 5,
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let s = SignInState::SignedOut;
        let s = s.next(SignInEvent::Begin).unwrap();
        assert_eq!(s, SignInState::RequestingCode);
        assert!(s.is_in_progress());

        let s = s.next(SignInEvent::CodeReceived(code())).unwrap();
        assert!(matches!(s, SignInState::AwaitingAuthorization { .. }));

        let s = s.next(SignInEvent::Granted(AccessToken::new("gho_x"))).unwrap();
        assert!(s.is_signed_in());

        let s = s.next(SignInEvent::SignOut).unwrap();
        assert_eq!(s, SignInState::SignedOut);
    }

    #[test]
    fn test_failure_and_retry() {
        let s = SignInState::RequestingCode
            .next(SignInEvent::Failed("offline".into()))
            .unwrap();
        assert_eq!(
            s,
            SignInState::Failed {
                message: "offline".into()
            }
        );
        assert_eq!(
            s.next(SignInEvent::Begin),
            Some(SignInState::RequestingCode)
        );

        let waiting = SignInState::AwaitingAuthorization { code: code() };
        assert!(matches!(
            waiting.next(SignInEvent::Failed("expired".into())),
            Some(SignInState::Failed { .. })
        ));
    }

    #[test]
    fn test_invalid_transitions() {
        assert_eq!(
            SignInState::SignedOut.next(SignInEvent::Granted(AccessToken::new("t"))),
            None
        );
        assert_eq!(
            SignInState::SignedIn {
                token: AccessToken::new("t")
            }
            .next(SignInEvent::Begin),
            None
        );
        assert_eq!(SignInState::SignedOut.next(SignInEvent::SignOut), None);
        assert_eq!(
            SignInState::RequestingCode.next(SignInEvent::Begin),
            None
        );
    }

    #[test]
    fn test_restore_and_sign_out() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path().join("credentials.enc"));

        let session = Session::restore(&store).unwrap();
        assert_eq!(session.state(), &SignInState::SignedOut);
        assert!(session.token().is_none());

        store.store_token("gho_abc").unwrap();
        let mut session = Session::restore(&store).unwrap();
        assert_eq!(session.token(), Some(&AccessToken::new("gho_abc")));

        session.sign_out(&store).unwrap();
        assert_eq!(session.state(), &SignInState::SignedOut);
        assert!(!store.has_token());
        assert!(Session::restore(&store).unwrap().token().is_none());
    }

    #[test]
    fn test_empty_token_is_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path().join("credentials.enc"));
        store.set(crate::auth::ACCESS_TOKEN_KEY, "").unwrap();
        assert!(!Session::restore(&store).unwrap().state().is_signed_in());
    }

    #[test]
    fn test_undecryptable_store_restores_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path().join("credentials.enc"));
        std::fs::write(store.path(), [0x5Au8; 64]).unwrap();

        let mut session = Session::restore(&store).unwrap();
        assert_eq!(session.state(), &SignInState::SignedOut);

        // signing out clears the broken file, so the next start is clean
        session.sign_out(&store).unwrap();
        assert!(!store.path().exists());
        assert!(Session::restore(&store).unwrap().token().is_none());
    }
}
