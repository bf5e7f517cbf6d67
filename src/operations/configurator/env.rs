use std::path::{Path, PathBuf};

use anyhow::Context;
use url::Url;

use super::Configurator;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone)]
pub struct EnvConfigurator {
    base_url: Url,
    session_path: PathBuf,
}

impl EnvConfigurator {
    /// Reads `BASE_URL` and `METOOLS_SESSION_FILE`.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let raw_base_url = lookup("BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_base_url.trim())
            .with_context(|| format!("BASE_URL is not a valid url: {raw_base_url}"))?;

        let session_path = lookup("METOOLS_SESSION_FILE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_session_path);

        Ok(Self {
            base_url,
            session_path,
        })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_session_path(mut self, session_path: impl Into<PathBuf>) -> Self {
        self.session_path = session_path.into();
        self
    }
}

fn default_session_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("metools").join(SESSION_FILE_NAME)
    } else if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".metools").join(SESSION_FILE_NAME)
    } else {
        PathBuf::from(".metools").join(SESSION_FILE_NAME)
    }
}

impl Configurator for EnvConfigurator {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn session_path(&self) -> &Path {
        &self.session_path
    }
}
