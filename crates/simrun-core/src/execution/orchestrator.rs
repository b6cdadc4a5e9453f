use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use super::client::{SimulationClient, StartedSession};
use super::decoder::{MarkerDecoder, ResponseDecoder};
use super::mode::{ExecutionMode, RunRequest};
use super::state::{ExecutionFlags, ExecutionSnapshot, InteractiveState};
use super::transcript::{Transcript, TranscriptEntry};
use crate::error::SimulationError;
use crate::language::LanguageId;

/// Shown instead of calling the service when the buffer is blank.
pub const BLANK_CODE_MESSAGE: &str = "Please enter some code to run.";

/// Owns all execution state of one editor and drives the simulation
/// service through it.
///
/// The orchestrator is responsible for:
/// - Starting interactive runs and feeding them user input
/// - Turning response markers into lifecycle transitions
/// - One-shot manual runs and code formatting
/// - Resetting transcript, output and session on mode, language and clear
///
/// Every async operation takes `&mut self`, so at most one request is ever
/// outstanding and transcript order follows call order. Front ends that need
/// to render while a request is suspended observe [`ExecutionSnapshot`]s
/// through [`subscribe`](Self::subscribe).
pub struct ExecutionOrchestrator<C: SimulationClient> {
    client: C,
    decoder: Arc<dyn ResponseDecoder>,
    language: LanguageId,
    source_code: String,
    mode: ExecutionMode,
    manual_input: String,
    transcript: Transcript,
    manual_output: String,
    session: Option<C::Session>,
    flags: ExecutionFlags,
    state: InteractiveState,
    run_id: Uuid,
    snapshots: watch::Sender<ExecutionSnapshot>,
}

impl<C: SimulationClient> ExecutionOrchestrator<C> {
    /// Creates an orchestrator using the text [`MarkerDecoder`].
    pub fn new(client: C, language: LanguageId, source_code: impl Into<String>) -> Self {
        Self::with_decoder(client, Arc::new(MarkerDecoder), language, source_code)
    }

    /// Creates an orchestrator with a custom response decoder.
    pub fn with_decoder(
        client: C,
        decoder: Arc<dyn ResponseDecoder>,
        language: LanguageId,
        source_code: impl Into<String>,
    ) -> Self {
        let (snapshots, _) = watch::channel(ExecutionSnapshot {
            language,
            ..ExecutionSnapshot::default()
        });

        Self {
            client,
            decoder,
            language,
            source_code: source_code.into(),
            mode: ExecutionMode::default(),
            manual_input: String::new(),
            transcript: Transcript::new(),
            manual_output: String::new(),
            session: None,
            flags: ExecutionFlags::default(),
            state: InteractiveState::Idle,
            run_id: Uuid::nil(),
            snapshots,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn manual_input(&self) -> &str {
        &self.manual_input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn manual_output(&self) -> &str {
        &self.manual_output
    }

    pub fn flags(&self) -> ExecutionFlags {
        self.flags
    }

    pub fn state(&self) -> InteractiveState {
        self.state
    }

    /// False while a continuation is in flight; the request holds the session.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.flags.waiting_for_input
    }

    /// Identifier of the most recent run, nil before the first one.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn snapshot(&self) -> ExecutionSnapshot {
        ExecutionSnapshot {
            language: self.language,
            mode: self.mode,
            state: self.state,
            flags: self.flags,
            has_session: self.session.is_some(),
            transcript: self.transcript.clone(),
            manual_output: self.manual_output.clone(),
        }
    }

    /// Receives a snapshot after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ExecutionSnapshot> {
        self.snapshots.subscribe()
    }

    /// The request the next [`run`](Self::run) would issue.
    pub fn run_request(&self) -> RunRequest {
        RunRequest {
            source_code: self.source_code.clone(),
            language: self.language,
            mode: self.mode,
            manual_input: match self.mode {
                ExecutionMode::Manual => Some(self.manual_input.clone()),
                ExecutionMode::Interactive => None,
            },
        }
    }

    // ============================================================================
    // Editor edits (no reset)
    // ============================================================================

    pub fn set_source_code(&mut self, source_code: impl Into<String>) {
        self.source_code = source_code.into();
    }

    pub fn set_manual_input(&mut self, manual_input: impl Into<String>) {
        self.manual_input = manual_input.into();
    }

    // ============================================================================
    // Resets
    // ============================================================================

    /// Switches language and loads `source_code` into the buffer.
    ///
    /// The caller supplies the code (persisted or template); any live
    /// session is discarded even if it was waiting for input.
    pub fn change_language(&mut self, language: LanguageId, source_code: impl Into<String>) {
        tracing::debug!("[Orchestrator] Language changed: {} -> {}", self.language, language);
        self.language = language;
        self.source_code = source_code.into();
        self.reset_execution_state();
        self.publish();
    }

    /// Switches execution mode. Returns `false` if `mode` is already active.
    pub fn set_mode(&mut self, mode: ExecutionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        tracing::debug!("[Orchestrator] Mode changed: {} -> {}", self.mode, mode);
        self.mode = mode;
        self.reset_execution_state();
        self.publish();
        true
    }

    /// Empties the buffer and all execution state.
    pub fn clear(&mut self) {
        self.source_code.clear();
        self.reset_execution_state();
        self.publish();
    }

    fn reset_execution_state(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!(run_id = %self.run_id, "[Orchestrator] Discarded live session");
        }
        self.transcript.clear();
        self.manual_output.clear();
        self.flags.error = false;
        self.flags.waiting_for_input = false;
        self.state = InteractiveState::Idle;
    }

    // ============================================================================
    // Runs
    // ============================================================================

    /// Runs the buffer in the current mode.
    ///
    /// Always starts from a clean slate. Blank code is rejected locally with
    /// [`BLANK_CODE_MESSAGE`] and the service is not called. Service failures
    /// are rendered as `Error: <message>` and set the error flag.
    pub async fn run(&mut self) {
        let request = self.run_request();
        self.reset_execution_state();

        if !request.has_code() {
            tracing::debug!("[Orchestrator] Rejected run: no source code");
            self.transcript
                .push(TranscriptEntry::stdout(BLANK_CODE_MESSAGE));
            self.manual_output = BLANK_CODE_MESSAGE.to_string();
            self.flags.error = true;
            self.state = InteractiveState::Errored;
            self.publish();
            return;
        }

        self.run_id = Uuid::new_v4();
        self.flags.run_pending = true;
        if request.mode == ExecutionMode::Interactive {
            self.state = InteractiveState::Running;
        }
        tracing::info!(
            run_id = %self.run_id,
            mode = %request.mode,
            language = request.language_label(),
            "[Orchestrator] Starting run"
        );
        self.publish();

        match request.mode {
            ExecutionMode::Interactive => self.start_interactive(&request).await,
            ExecutionMode::Manual => self.run_manual(&request).await,
        }

        self.flags.run_pending = false;
        self.publish();
    }

    async fn start_interactive(&mut self, request: &RunRequest) {
        let started = self
            .client
            .start_interactive_run(&request.source_code, request.language_label())
            .await;

        match started {
            Ok(StartedSession {
                session,
                response_text,
            }) => {
                self.session = Some(session);
                self.apply_response(&response_text);
            }
            Err(err) => self.record_failure(&err),
        }
    }

    async fn run_manual(&mut self, request: &RunRequest) {
        let input_blob = request.manual_input.as_deref().unwrap_or_default();
        let result = self
            .client
            .run_code_once(&request.source_code, request.language_label(), input_blob)
            .await;

        match result {
            Ok(output) => self.manual_output = output,
            Err(err) => {
                tracing::warn!(run_id = %self.run_id, "[Orchestrator] Manual run failed: {}", err);
                self.manual_output = format!("Error: {err}");
                self.flags.error = true;
            }
        }
    }

    /// Sends `user_input` to the waiting program.
    ///
    /// Returns `false` without touching any state when the program is not
    /// waiting for input, no session is live, or the input is blank.
    pub async fn supply_input(&mut self, user_input: &str) -> bool {
        if !self.flags.waiting_for_input || user_input.trim().is_empty() {
            tracing::debug!("[Orchestrator] Ignored input: program is not waiting for it");
            return false;
        }
        // Held by the request while the turn is in flight.
        let Some(mut session) = self.session.take() else {
            tracing::debug!("[Orchestrator] Ignored input: no live session");
            return false;
        };

        self.transcript.push(TranscriptEntry::stdin(user_input));
        self.flags.waiting_for_input = false;
        self.flags.run_pending = true;
        self.state = InteractiveState::Running;
        self.publish();

        let result = self
            .client
            .continue_interactive_run(&mut session, user_input)
            .await;

        self.session = Some(session);
        self.flags.run_pending = false;
        match result {
            Ok(response_text) => self.apply_response(&response_text),
            // The session survives a failed turn; only markers and resets end it.
            Err(err) => self.record_failure(&err),
        }
        self.publish();
        true
    }

    /// Formats the buffer in place.
    ///
    /// Returns `false` for a blank buffer. Failures are reported as
    /// `Formatting Error: <message>` in both the transcript and the manual
    /// output.
    pub async fn format_code(&mut self) -> bool {
        if self.source_code.trim().is_empty() {
            return false;
        }

        self.flags.format_pending = true;
        self.publish();

        let result = self
            .client
            .format_code(&self.source_code, self.language.name())
            .await;

        self.flags.format_pending = false;
        match result {
            Ok(formatted) => self.source_code = formatted,
            Err(err) => {
                tracing::warn!("[Orchestrator] Formatting failed: {}", err);
                let message = format!("Formatting Error: {err}");
                self.transcript.push(TranscriptEntry::stdout(message.clone()));
                self.manual_output = message;
                self.flags.error = true;
            }
        }
        self.publish();
        true
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Applies one decoded response.
    ///
    /// Markers are applied in detection order; complete and error both end
    /// the session, so they win over a simultaneous input request.
    fn apply_response(&mut self, raw: &str) {
        let decoded = self.decoder.decode(raw);
        tracing::debug!(
            run_id = %self.run_id,
            needs_input = decoded.saw_needs_input,
            complete = decoded.saw_complete,
            error = decoded.saw_error,
            "[Orchestrator] Decoded response"
        );

        if decoded.saw_needs_input {
            self.flags.waiting_for_input = true;
            self.state = InteractiveState::AwaitingInput;
        }
        if decoded.saw_complete {
            self.flags.waiting_for_input = false;
            self.session = None;
            self.state = InteractiveState::Completed;
        }
        if decoded.saw_error {
            self.flags.error = true;
            self.flags.waiting_for_input = false;
            self.session = None;
            self.state = InteractiveState::Errored;
        }
        if !decoded.any_marker() {
            tracing::warn!(run_id = %self.run_id, "[Orchestrator] Response carried no lifecycle marker");
            self.state = InteractiveState::Stalled;
        }

        if decoded.has_output() {
            self.transcript
                .push(TranscriptEntry::stdout(decoded.cleaned_text));
        }
    }

    fn record_failure(&mut self, err: &SimulationError) {
        tracing::warn!(
            run_id = %self.run_id,
            retryable = err.is_retryable(),
            "[Orchestrator] Simulation request failed: {}",
            err
        );
        self.transcript
            .push(TranscriptEntry::stdout(format!("Error: {err}")));
        self.flags.error = true;
        self.state = if self.session.is_some() {
            InteractiveState::Stalled
        } else {
            InteractiveState::Errored
        };
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
