//! Secret service implementation.
//!
//! Reads `secret.json` once, caches it, and applies environment overrides
//! (`GEMINI_API_KEY`, `SIMRUN_MODEL`) on every load.

use simrun_core::Result;
use simrun_core::config::SecretConfig;
use simrun_core::secret::SecretService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::paths::SimrunPaths;

/// File-backed [`SecretService`].
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    /// Parsed file contents, before environment overrides.
    cached: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Uses `secret.json` in the config directory (or under `base_path`).
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = SimrunPaths::new(base_path).secret_file()?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or blank file is an empty configuration, not an error.
    async fn read_file(&self) -> Result<SecretConfig> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            tracing::debug!("[SecretService] No secret file at {}", self.path.display());
            return Ok(SecretConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }

        Ok(serde_json::from_str(&content)?)
    }

    async fn file_config(&self) -> Result<SecretConfig> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = self.read_file().await?;
        *self.cached.write().await = Some(loaded.clone());
        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        Ok(self
            .file_config()
            .await?
            .with_overrides(|key| std::env::var(key).ok()))
    }
}
