use std::path::Path;

use thiserror::Error;
use url::Url;

use crate::models::SessionState;

pub(crate) mod configurator;
pub(crate) mod session_storage;

/// Where the client finds its backend and keeps its session.
pub trait Configurator {
    fn base_url(&self) -> &Url;
    fn session_path(&self) -> &Path;
}

#[derive(Debug, Error)]
pub enum SessionStorageError {
    #[error("could not access session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is corrupted: {source}")]
    Corrupted {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode session: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Durable home of a [`SessionState`]. The session writes through to it on
/// every login and logout, so whatever `load` returns matches memory.
#[async_trait::async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<SessionState>, SessionStorageError>;

    async fn save(&self, state: &SessionState) -> Result<(), SessionStorageError>;

    async fn clear(&self) -> Result<(), SessionStorageError>;
}

#[async_trait::async_trait]
impl<T: SessionStorage + ?Sized> SessionStorage for Box<T> {
    async fn load(&self) -> Result<Option<SessionState>, SessionStorageError> {
        (**self).load().await
    }

    async fn save(&self, state: &SessionState) -> Result<(), SessionStorageError> {
        (**self).save(state).await
    }

    async fn clear(&self) -> Result<(), SessionStorageError> {
        (**self).clear().await
    }
}
