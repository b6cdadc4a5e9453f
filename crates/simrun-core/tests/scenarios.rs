//! End-to-end scenarios through the public orchestrator API.

use std::sync::Mutex;

use simrun_core::LanguageId;
use simrun_core::SimulationError;
use simrun_core::execution::{
    EntryKind, ExecutionOrchestrator, InteractiveState, MarkerDecoder, ResponseDecoder,
    SimulationClient, StartedSession, TranscriptEntry,
};

/// Answers every start/continue with the next canned reply.
struct CannedClient {
    replies: Mutex<Vec<Result<&'static str, &'static str>>>,
    calls: Mutex<usize>,
}

impl CannedClient {
    fn new(mut replies: Vec<Result<&'static str, &'static str>>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(0),
        }
    }

    fn reply(&self) -> Result<String, SimulationError> {
        *self.calls.lock().unwrap() += 1;
        match self.replies.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(text.to_string()),
            Some(Err(message)) => Err(SimulationError::upstream(message)),
            None => Err(SimulationError::EmptyResponse("no canned reply left".into())),
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl SimulationClient for CannedClient {
    type Session = ();

    async fn start_interactive_run(
        &self,
        _source_code: &str,
        _language_label: &str,
    ) -> Result<StartedSession<()>, SimulationError> {
        Ok(StartedSession {
            session: (),
            response_text: self.reply()?,
        })
    }

    async fn continue_interactive_run(
        &self,
        _session: &mut (),
        _user_input: &str,
    ) -> Result<String, SimulationError> {
        self.reply()
    }

    async fn run_code_once(
        &self,
        _source_code: &str,
        _language_label: &str,
        _input_blob: &str,
    ) -> Result<String, SimulationError> {
        self.reply()
    }

    async fn format_code(
        &self,
        _source_code: &str,
        _language_label: &str,
    ) -> Result<String, SimulationError> {
        self.reply()
    }
}

fn orchestrator(
    code: &str,
    replies: Vec<Result<&'static str, &'static str>>,
) -> ExecutionOrchestrator<CannedClient> {
    ExecutionOrchestrator::new(CannedClient::new(replies), LanguageId::Cpp, code)
}

#[tokio::test]
async fn blank_code_never_reaches_the_service() {
    let mut orch = orchestrator("", vec![]);

    orch.run().await;

    assert_eq!(
        orch.transcript().entries(),
        &[TranscriptEntry::stdout("Please enter some code to run.")]
    );
    assert!(orch.flags().error);
    assert_eq!(orch.client().call_count(), 0);
}

#[tokio::test]
async fn interactive_dialogue_to_completion() {
    let mut orch = orchestrator(
        "int main() { int n; std::cin >> n; std::cout << \"Result: \" << n; }",
        vec![Ok("Hello\n[NEEDS_INPUT]"), Ok("Result: 42[EXECUTION_COMPLETE]")],
    );

    orch.run().await;
    assert_eq!(orch.transcript().entries(), &[TranscriptEntry::stdout("Hello")]);
    assert!(orch.is_waiting_for_input());
    assert!(orch.has_session());

    orch.supply_input("42").await;
    assert_eq!(
        orch.transcript().entries(),
        &[
            TranscriptEntry::stdout("Hello"),
            TranscriptEntry::stdin("42"),
            TranscriptEntry::stdout("Result: 42\n\n[Program finished]"),
        ]
    );
    assert!(!orch.is_waiting_for_input());
    assert!(!orch.has_session());
    assert_eq!(orch.state(), InteractiveState::Completed);
}

#[tokio::test]
async fn start_failure_is_rendered_not_raised() {
    let mut orch = orchestrator("int main() {}", vec![Err("timeout")]);

    orch.run().await;

    assert_eq!(
        orch.transcript().entries(),
        &[TranscriptEntry::stdout("Error: timeout")]
    );
    assert!(orch.flags().error);
    assert!(!orch.has_session());
}

#[tokio::test]
async fn language_switch_discards_waiting_session() {
    let mut orch = orchestrator("int main() {}", vec![Ok("Name? [NEEDS_INPUT]")]);
    orch.run().await;
    assert_eq!(orch.state(), InteractiveState::AwaitingInput);

    orch.change_language(LanguageId::Python, "print('hi')");

    assert!(orch.transcript().is_empty());
    assert!(!orch.has_session());
    assert!(!orch.is_waiting_for_input());

    let calls_before = orch.client().call_count();
    assert!(!orch.supply_input("Ada").await);
    assert_eq!(orch.client().call_count(), calls_before);
}

#[test]
fn plain_responses_decode_to_exactly_their_text() {
    for raw in ["x", "  padded  ", "multi\nline\n", "tabs\tand [brackets]"] {
        let decoded = MarkerDecoder.decode(raw);
        assert_eq!(decoded.cleaned_text, raw);
        assert!(!decoded.any_marker());
    }
}

#[tokio::test]
async fn plain_response_appends_one_stdout_entry() {
    for raw in ["x", "  padded  ", "multi\nline\n"] {
        let mut orch = orchestrator("int main() {}", vec![Ok(raw)]);
        orch.run().await;
        assert_eq!(orch.transcript().len(), 1);
        assert_eq!(orch.transcript().entries()[0].kind, EntryKind::Stdout);
        assert_eq!(orch.transcript().entries()[0].content, raw);
    }
}

#[test]
fn single_markers_set_exactly_one_flag() {
    let cases = [
        ("out[NEEDS_INPUT]", (true, false, false)),
        ("out[EXECUTION_COMPLETE]", (false, true, false)),
        ("out[EXECUTION_ERROR]", (false, false, true)),
    ];
    for (raw, expected) in cases {
        let decoded = MarkerDecoder.decode(raw);
        assert_eq!(
            (decoded.saw_needs_input, decoded.saw_complete, decoded.saw_error),
            expected,
            "decoding {raw:?}"
        );
        assert!(!decoded.cleaned_text.contains("[NEEDS_INPUT]"));
        assert!(!decoded.cleaned_text.contains("[EXECUTION_COMPLETE]"));
        assert!(!decoded.cleaned_text.contains("[EXECUTION_ERROR]"));
    }
}
