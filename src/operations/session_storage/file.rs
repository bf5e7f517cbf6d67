use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::models::SessionState;
use crate::operations::{SessionStorage, SessionStorageError};

/// Persists the session as JSON at a fixed path. On Unix the file is created
/// owner read/write only.
#[derive(Clone, Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn io_error(&self, source: std::io::Error) -> SessionStorageError {
        SessionStorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Creates `path` afresh, owner read/write only on Unix, and fills it.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

#[async_trait::async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<SessionState>, SessionStorageError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let state: SessionState =
            serde_json::from_slice(&contents).map_err(|source| SessionStorageError::Corrupted {
                path: self.path.display().to_string(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), "loaded persisted session");
        Ok(Some(state))
    }

    async fn save(&self, state: &SessionState) -> Result<(), SessionStorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_vec_pretty(state).map_err(SessionStorageError::Encode)?;

        // Write beside the target and rename so a crash never leaves half a file.
        let staging = self.staging_path();
        let staged = match write_private(&staging, &contents).await {
            Ok(()) => tokio::fs::rename(&staging, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = staged {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %staging.display(), error = %cleanup, "could not remove staged session");
                }
            }
            return Err(self.io_error(e));
        }

        tracing::debug!(path = %self.path.display(), "persisted session");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed persisted session");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
