//! TOML-backed [`EditorStateRepository`].
//!
//! ```toml
//! language = "python"
//!
//! [code]
//! python = "print('hi')\n"
//! go = "package main\n"
//! ```

use serde::{Deserialize, Serialize};
use simrun_core::editor::EditorStateRepository;
use simrun_core::{LanguageId, Result, SimrunError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::paths::SimrunPaths;
use crate::storage::AtomicTomlFile;

/// On-disk layout. Language ids are kept as strings so an entry written by a
/// build with more languages does not make the whole file unreadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EditorStateFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default)]
    code: BTreeMap<String, String>,
}

/// Stores the editor state in `editor_state.toml`.
#[derive(Clone)]
pub struct TomlEditorStateRepository {
    file: Arc<AtomicTomlFile<EditorStateFile>>,
}

impl TomlEditorStateRepository {
    /// Uses `editor_state.toml` in the config directory (or under `base_path`).
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = SimrunPaths::new(base_path).editor_state_file()?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn read(&self) -> Result<EditorStateFile> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| SimrunError::internal(format!("Editor state load task failed: {e}")))?
            .map(Option::unwrap_or_default)
    }

    async fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut EditorStateFile) + Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.update(f))
            .await
            .map_err(|e| SimrunError::internal(format!("Editor state save task failed: {e}")))?
    }
}

#[async_trait::async_trait]
impl EditorStateRepository for TomlEditorStateRepository {
    async fn load_language(&self) -> Result<Option<LanguageId>> {
        let Some(saved) = self.read().await?.language else {
            return Ok(None);
        };

        match saved.parse::<LanguageId>() {
            Ok(language) => Ok(Some(language)),
            Err(_) => {
                tracing::warn!("[EditorState] Ignoring unsupported saved language '{}'", saved);
                Ok(None)
            }
        }
    }

    async fn save_language(&self, language: LanguageId) -> Result<()> {
        self.update(move |state| state.language = Some(language.as_str().to_string()))
            .await
    }

    async fn load_code(&self, language: LanguageId) -> Result<Option<String>> {
        Ok(self.read().await?.code.remove(language.as_str()))
    }

    async fn save_code(&self, language: LanguageId, code: &str) -> Result<()> {
        let code = code.to_string();
        self.update(move |state| {
            state.code.insert(language.as_str().to_string(), code);
        })
        .await
    }
}
