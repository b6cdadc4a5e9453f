//! Error types for simrun.
//!
//! Two families live here:
//! - [`SimrunError`]: the crate-wide error for configuration and persistence.
//! - [`SimulationError`]: failures reported by a [`SimulationClient`](crate::execution::SimulationClient).
//!   These never escape the orchestrator; they are rendered into the transcript
//!   or the manual output as `Error: <message>`.

use thiserror::Error;

/// A shared error type for configuration, storage and lookup failures.
#[derive(Error, Debug, Clone)]
pub enum SimrunError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SimrunError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for SimrunError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SimrunError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SimrunError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SimrunError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SimrunError>`.
pub type Result<T> = std::result::Result<T, SimrunError>;

/// Failure reported by the simulation service boundary.
///
/// `Display` yields the human-readable message that ends up after the
/// `Error: ` prefix in the transcript.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("{message}")]
    Transport { message: String, is_retryable: bool },

    /// The service answered with a non-success status.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
        is_retryable: bool,
    },

    /// The service answered but produced no usable text.
    #[error("{0}")]
    EmptyResponse(String),

    /// The client is missing an API key or similar.
    #[error("{0}")]
    Configuration(String),
}

impl SimulationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            is_retryable: false,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
            is_retryable: false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { is_retryable, .. } | Self::Upstream { is_retryable, .. } => {
                *is_retryable
            }
            Self::EmptyResponse(_) | Self::Configuration(_) => false,
        }
    }
}
