use std::path::{Path, PathBuf};

use url::Url;

use super::Configurator;

pub(crate) mod env;

/// A configurator holding fixed values, for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticConfigurator {
    base_url: Url,
    session_path: PathBuf,
}

impl StaticConfigurator {
    pub fn new(base_url: Url, session_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url,
            session_path: session_path.into(),
        }
    }
}

impl Configurator for StaticConfigurator {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn session_path(&self) -> &Path {
        &self.session_path
    }
}
