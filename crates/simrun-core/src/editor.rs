//! Persisted editor state.
//!
//! The buffer for each language and the last selected language survive
//! restarts. Storage lives in the infrastructure crate; this module defines
//! the interface and the restoration rules.

use crate::error::Result;
use crate::language::LanguageId;

/// Repository for the editor buffer and language selection.
#[async_trait::async_trait]
pub trait EditorStateRepository: Send + Sync {
    /// Last selected language, if one was saved and is still supported.
    async fn load_language(&self) -> Result<Option<LanguageId>>;

    async fn save_language(&self, language: LanguageId) -> Result<()>;

    /// Saved buffer for `language`. An empty string is a valid saved buffer.
    async fn load_code(&self, language: LanguageId) -> Result<Option<String>>;

    async fn save_code(&self, language: LanguageId, code: &str) -> Result<()>;
}

/// Returns the saved language, or the default when nothing usable is stored.
pub async fn restore_language(repository: &dyn EditorStateRepository) -> LanguageId {
    match repository.load_language().await {
        Ok(Some(language)) => language,
        Ok(None) => LanguageId::default(),
        Err(e) => {
            tracing::warn!("[EditorState] Failed to load saved language: {}", e);
            LanguageId::default()
        }
    }
}

/// Returns the saved buffer for `language`, or its starter template.
pub async fn restore_code(repository: &dyn EditorStateRepository, language: LanguageId) -> String {
    match repository.load_code(language).await {
        Ok(Some(code)) => code,
        Ok(None) => language.template().to_string(),
        Err(e) => {
            tracing::warn!("[EditorState] Failed to load saved code for {}: {}", language, e);
            language.template().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimrunError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryEditorState {
        language: Mutex<Option<LanguageId>>,
        code: Mutex<HashMap<LanguageId, String>>,
        broken: bool,
    }

    #[async_trait::async_trait]
    impl EditorStateRepository for MemoryEditorState {
        async fn load_language(&self) -> Result<Option<LanguageId>> {
            if self.broken {
                return Err(SimrunError::io("disk on fire"));
            }
            Ok(*self.language.lock().unwrap())
        }

        async fn save_language(&self, language: LanguageId) -> Result<()> {
            *self.language.lock().unwrap() = Some(language);
            Ok(())
        }

        async fn load_code(&self, language: LanguageId) -> Result<Option<String>> {
            if self.broken {
                return Err(SimrunError::io("disk on fire"));
            }
            Ok(self.code.lock().unwrap().get(&language).cloned())
        }

        async fn save_code(&self, language: LanguageId, code: &str) -> Result<()> {
            self.code.lock().unwrap().insert(language, code.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_restore_defaults() {
        let repo = MemoryEditorState::default();
        assert_eq!(restore_language(&repo).await, LanguageId::Cpp);
        assert_eq!(
            restore_code(&repo, LanguageId::Java).await,
            LanguageId::Java.template()
        );
    }

    #[tokio::test]
    async fn test_restore_saved_values() {
        let repo = MemoryEditorState::default();
        repo.save_language(LanguageId::Go).await.unwrap();
        repo.save_code(LanguageId::Go, "package main").await.unwrap();

        assert_eq!(restore_language(&repo).await, LanguageId::Go);
        assert_eq!(restore_code(&repo, LanguageId::Go).await, "package main");
    }

    #[tokio::test]
    async fn test_saved_empty_buffer_is_kept() {
        let repo = MemoryEditorState::default();
        repo.save_code(LanguageId::C, "").await.unwrap();
        assert_eq!(restore_code(&repo, LanguageId::C).await, "");
    }

    #[tokio::test]
    async fn test_storage_errors_fall_back() {
        let repo = MemoryEditorState {
            broken: true,
            ..MemoryEditorState::default()
        };
        assert_eq!(restore_language(&repo).await, LanguageId::Cpp);
        assert_eq!(
            restore_code(&repo, LanguageId::Python).await,
            LanguageId::Python.template()
        );
    }
}
