use crate::error::SimulationError;

/// Result of opening a multi-turn simulation.
#[derive(Debug, Clone)]
pub struct StartedSession<S> {
    pub session: S,
    pub response_text: String,
}

/// Boundary to the remote service that stands in for a compiler/interpreter.
///
/// The service generates plausible program output; nothing is executed.
/// `Session` is an opaque handle to an open dialogue. It is owned
/// exclusively by whoever started it and passed back mutably on every turn.
#[async_trait::async_trait]
pub trait SimulationClient: Send + Sync {
    type Session: Send + Sync;

    /// Opens a dialogue for `source_code` and returns the first response.
    async fn start_interactive_run(
        &self,
        source_code: &str,
        language_label: &str,
    ) -> Result<StartedSession<Self::Session>, SimulationError>;

    /// Sends `user_input` as the program's next stdin line.
    async fn continue_interactive_run(
        &self,
        session: &mut Self::Session,
        user_input: &str,
    ) -> Result<String, SimulationError>;

    /// Simulates a whole run against a fixed stdin blob.
    async fn run_code_once(
        &self,
        source_code: &str,
        language_label: &str,
        input_blob: &str,
    ) -> Result<String, SimulationError>;

    /// Returns `source_code` reformatted in the language's conventional style.
    async fn format_code(
        &self,
        source_code: &str,
        language_label: &str,
    ) -> Result<String, SimulationError>;
}
