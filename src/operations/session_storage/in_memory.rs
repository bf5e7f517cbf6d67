use std::{fmt::Debug, sync::Arc};

use tokio::sync::RwLock;

use crate::models::SessionState;
use crate::operations::{SessionStorage, SessionStorageError};

/// Keeps the session only for the lifetime of the process. Clones share state.
#[derive(Clone, Default)]
pub struct InMemorySessionStorage {
    state: Arc<RwLock<Option<SessionState>>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Debug for InMemorySessionStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formatter = f.debug_struct("InMemorySessionStorage");
        if let Ok(state) = self.state.try_read() {
            formatter.field(
                "username",
                &state.as_ref().map(|state| state.username.as_str()),
            );
        }
        formatter.finish()
    }
}

#[async_trait::async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn load(&self) -> Result<Option<SessionState>, SessionStorageError> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, state: &SessionState) -> Result<(), SessionStorageError> {
        *self.state.write().await = Some(state.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStorageError> {
        self.state.write().await.take();
        Ok(())
    }
}
