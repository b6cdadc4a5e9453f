use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimrunError;
use crate::language::LanguageId;

/// Selects which controller handles a run request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Multi-turn dialogue; the program may ask for input as it goes.
    #[default]
    Interactive,
    /// One-shot run against a fixed input blob.
    Manual,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => f.write_str("interactive"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = SimrunError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "interactive" | "i" => Ok(Self::Interactive),
            "manual" | "m" => Ok(Self::Manual),
            _ => Err(SimrunError::not_found("execution mode", value)),
        }
    }
}

/// Everything a single run needs, captured when the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub source_code: String,
    pub language: LanguageId,
    pub mode: ExecutionMode,
    /// Only consulted in [`ExecutionMode::Manual`].
    pub manual_input: Option<String>,
}

impl RunRequest {
    /// Label sent to the simulation service (`"C++"`, `"Python"`, ...).
    pub fn language_label(&self) -> &'static str {
        self.language.name()
    }

    /// Blank code never reaches the simulation service.
    pub fn has_code(&self) -> bool {
        !self.source_code.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("Manual".parse::<ExecutionMode>().unwrap(), ExecutionMode::Manual);
        assert_eq!("i".parse::<ExecutionMode>().unwrap(), ExecutionMode::Interactive);
        assert!("batch".parse::<ExecutionMode>().is_err());
        assert_eq!(ExecutionMode::Manual.to_string(), "manual");
    }

    #[test]
    fn test_request_blank_code() {
        let request = RunRequest {
            source_code: " \n\t".to_string(),
            language: LanguageId::Python,
            mode: ExecutionMode::Interactive,
            manual_input: None,
        };
        assert!(!request.has_code());
        assert_eq!(request.language_label(), "Python");
    }
}
