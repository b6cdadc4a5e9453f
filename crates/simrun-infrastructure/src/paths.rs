//! Path management for simrun configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/simrun/            # Config directory (platform config dir + "simrun")
//! ├── secret.json              # API keys
//! └── editor_state.toml        # Last language and per-language buffers
//! ```

use simrun_core::{Result, SimrunError};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "simrun";
const SECRET_FILE: &str = "secret.json";
const EDITOR_STATE_FILE: &str = "editor_state.toml";

/// Resolves simrun's files, optionally under an explicit base directory.
#[derive(Debug, Clone, Default)]
pub struct SimrunPaths {
    base: Option<PathBuf>,
}

impl SimrunPaths {
    /// `base` replaces the platform config directory when given (tests, portable installs).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// The simrun configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| SimrunError::config("Cannot find the user config directory")),
        }
    }

    pub fn secret_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(SECRET_FILE))
    }

    pub fn editor_state_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(EDITOR_STATE_FILE))
    }
}
