use thiserror::Error;
use tracing::instrument;

use crate::client::{ApiClient, ApiError};
use crate::models::{LoginData, SessionState};
use crate::operations::{SessionStorage, SessionStorageError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] SessionStorageError),
    #[error("not logged in")]
    NotLoggedIn,
}

/// The logged-in identity, kept in memory and mirrored to `S`.
///
/// Memory and storage only change together: `login` persists before it
/// replaces the in-memory state, and `logout` empties both.
#[derive(Debug)]
pub struct Session<S> {
    client: ApiClient,
    storage: S,
    state: SessionState,
}

impl<S: SessionStorage> Session<S> {
    /// An empty session. Anything already in `storage` is ignored until
    /// [`Session::restore`] or overwritten by the next login.
    pub fn new(client: ApiClient, storage: S) -> Self {
        Self {
            client,
            storage,
            state: SessionState::default(),
        }
    }

    /// Picks up whatever a previous process persisted.
    pub async fn restore(client: ApiClient, storage: S) -> Result<Self, SessionError> {
        let state = storage.load().await?.unwrap_or_default();
        if state.is_logged_in() {
            tracing::debug!(username = %state.username, "restored session");
        }
        Ok(Self {
            client,
            storage,
            state,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn username(&self) -> &str {
        &self.state.username
    }

    pub fn email(&self) -> &str {
        &self.state.email
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn token(&self) -> Result<&str, SessionError> {
        self.state.token().ok_or(SessionError::NotLoggedIn)
    }

    /// Logs in, then asks the backend who the token belongs to. State is only
    /// replaced once both calls and the persist succeed.
    #[instrument(level = "info", skip(self, password))]
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<&SessionState, SessionError> {
        let token = self
            .client
            .login(&LoginData::new(username, password))
            .await?;
        let profile = self.client.me(&token).await?;

        let state = SessionState {
            username: profile.username,
            email: profile.email,
            token,
        };
        self.storage.save(&state).await?;
        self.state = state;

        tracing::info!(username = %self.state.username, "logged in");
        Ok(&self.state)
    }

    /// Forgets the identity locally and in storage. The backend is not told.
    #[instrument(level = "info", skip(self))]
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::default();
        self.storage.clear().await?;
        tracing::info!("logged out");
        Ok(())
    }
}
