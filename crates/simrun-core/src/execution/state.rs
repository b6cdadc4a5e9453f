use serde::{Deserialize, Serialize};

use super::mode::ExecutionMode;
use super::transcript::Transcript;
use crate::language::LanguageId;

/// Transient UI flags derived from the orchestrator.
///
/// `waiting_for_input` is never true while `run_pending` is, and never true
/// without a live session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionFlags {
    pub waiting_for_input: bool,
    pub run_pending: bool,
    pub format_pending: bool,
    pub error: bool,
}

impl ExecutionFlags {
    /// Run and format triggers are disabled while anything is in flight.
    pub fn is_busy(&self) -> bool {
        self.run_pending || self.format_pending
    }
}

/// Lifecycle of an interactive run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractiveState {
    /// No run since the last reset.
    #[default]
    Idle,
    /// A start or continue request is in flight.
    Running,
    /// The program asked for input; the session is live.
    AwaitingInput,
    /// The service answered without any lifecycle marker, or a turn failed.
    /// The session is still live but the program neither asked for input
    /// nor finished.
    Stalled,
    /// Terminated normally; the session is gone.
    Completed,
    /// Terminated abnormally, or a request failed.
    Errored,
}

impl InteractiveState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Errored)
    }
}

/// Cloneable view of everything a front end renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    pub language: LanguageId,
    pub mode: ExecutionMode,
    pub state: InteractiveState,
    pub flags: ExecutionFlags,
    pub has_session: bool,
    pub transcript: Transcript,
    pub manual_output: String,
}
