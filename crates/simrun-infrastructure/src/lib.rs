//! Filesystem-backed implementations of simrun's storage traits.
//!
//! Everything lives under the platform config directory (`~/.config/simrun`
//! on Linux); see [`paths::SimrunPaths`].

pub mod editor_state_repository;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use editor_state_repository::TomlEditorStateRepository;
pub use paths::SimrunPaths;
pub use secret_service::SecretServiceImpl;
