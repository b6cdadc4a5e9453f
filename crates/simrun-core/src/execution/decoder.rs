//! Control-marker decoding of raw simulation responses.
//!
//! The simulation service signals program lifecycle events by embedding
//! literal tokens in its free-form text. Decoding is pure: it only reports
//! which markers fired and what text remains. The orchestrator applies the
//! resulting state transitions.

/// The simulated program is blocked waiting for user input.
pub const NEEDS_INPUT_MARKER: &str = "[NEEDS_INPUT]";

/// The simulated program terminated normally.
pub const EXECUTION_COMPLETE_MARKER: &str = "[EXECUTION_COMPLETE]";

/// The simulated program terminated abnormally.
pub const EXECUTION_ERROR_MARKER: &str = "[EXECUTION_ERROR]";

/// Replaces [`EXECUTION_COMPLETE_MARKER`] in the visible output.
pub const PROGRAM_FINISHED_ANNOTATION: &str = "\n\n[Program finished]";

/// Structured view of one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedResponse {
    pub cleaned_text: String,
    pub saw_needs_input: bool,
    pub saw_complete: bool,
    pub saw_error: bool,
}

impl DecodedResponse {
    /// A plain response with no lifecycle signal.
    pub fn text(cleaned_text: impl Into<String>) -> Self {
        Self {
            cleaned_text: cleaned_text.into(),
            ..Self::default()
        }
    }

    pub fn any_marker(&self) -> bool {
        self.saw_needs_input || self.saw_complete || self.saw_error
    }

    /// Complete or error: the session must be discarded.
    pub fn is_terminal(&self) -> bool {
        self.saw_complete || self.saw_error
    }

    /// Whether this response contributes a transcript entry.
    ///
    /// A marker that leaves no visible text only changes state; an empty
    /// entry is never recorded.
    pub fn has_output(&self) -> bool {
        !self.cleaned_text.is_empty()
    }
}

/// Translates raw response text into a [`DecodedResponse`].
///
/// Kept behind a trait so the text-marker convention can be replaced by a
/// structured response format without touching the state machine.
pub trait ResponseDecoder: Send + Sync {
    fn decode(&self, raw: &str) -> DecodedResponse;
}

/// Decoder for the `[NEEDS_INPUT]` / `[EXECUTION_COMPLETE]` /
/// `[EXECUTION_ERROR]` text convention.
///
/// Markers are checked in that order against the progressively cleaned
/// text. Only the first occurrence of each marker is rewritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerDecoder;

impl ResponseDecoder for MarkerDecoder {
    fn decode(&self, raw: &str) -> DecodedResponse {
        let mut text = raw.to_string();

        let saw_needs_input = text.contains(NEEDS_INPUT_MARKER);
        if saw_needs_input {
            text = text
                .replacen(NEEDS_INPUT_MARKER, "", 1)
                .trim_end()
                .to_string();
        }

        let saw_complete = text.contains(EXECUTION_COMPLETE_MARKER);
        if saw_complete {
            text = text
                .replacen(EXECUTION_COMPLETE_MARKER, PROGRAM_FINISHED_ANNOTATION, 1)
                .trim()
                .to_string();
        }

        let saw_error = text.contains(EXECUTION_ERROR_MARKER);
        if saw_error {
            text = text
                .replacen(EXECUTION_ERROR_MARKER, "", 1)
                .trim()
                .to_string();
        }

        DecodedResponse {
            cleaned_text: text,
            saw_needs_input,
            saw_complete,
            saw_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> DecodedResponse {
        MarkerDecoder.decode(raw)
    }

    #[test]
    fn test_needs_input_is_stripped_and_right_trimmed() {
        let decoded = decode("Hello\n[NEEDS_INPUT]");
        assert_eq!(decoded.cleaned_text, "Hello");
        assert!(decoded.saw_needs_input);
        assert!(!decoded.saw_complete);
        assert!(!decoded.saw_error);
    }

    #[test]
    fn test_needs_input_keeps_leading_whitespace() {
        let decoded = decode("  Enter a number: [NEEDS_INPUT]\n");
        assert_eq!(decoded.cleaned_text, "  Enter a number:");
    }

    #[test]
    fn test_complete_is_replaced_with_annotation() {
        let decoded = decode("Result: 42[EXECUTION_COMPLETE]");
        assert_eq!(decoded.cleaned_text, "Result: 42\n\n[Program finished]");
        assert!(decoded.saw_complete);
        assert!(!decoded.saw_needs_input);
        assert!(!decoded.saw_error);
        assert!(decoded.is_terminal());
    }

    #[test]
    fn test_complete_alone_still_has_output() {
        let decoded = decode("[EXECUTION_COMPLETE]");
        assert_eq!(decoded.cleaned_text, "[Program finished]");
        assert!(decoded.has_output());
    }

    #[test]
    fn test_error_is_stripped_and_trimmed() {
        let decoded = decode("\nSegmentation fault (core dumped)\n[EXECUTION_ERROR]\n");
        assert_eq!(decoded.cleaned_text, "Segmentation fault (core dumped)");
        assert!(decoded.saw_error);
        assert!(!decoded.saw_complete);
        assert!(!decoded.saw_needs_input);
    }

    #[test]
    fn test_error_alone_has_no_output() {
        let decoded = decode("[EXECUTION_ERROR]");
        assert!(decoded.saw_error);
        assert!(!decoded.has_output());
    }

    #[test]
    fn test_plain_text_passes_through_untouched() {
        let raw = "  line one\nline two  \n";
        let decoded = decode(raw);
        assert_eq!(decoded, DecodedResponse::text(raw));
        assert!(!decoded.any_marker());
    }

    #[test]
    fn test_empty_response() {
        let decoded = decode("");
        assert!(!decoded.any_marker());
        assert!(!decoded.has_output());
    }

    #[test]
    fn test_markers_fire_independently() {
        let decoded = decode("partial[NEEDS_INPUT] done[EXECUTION_COMPLETE]");
        assert!(decoded.saw_needs_input);
        assert!(decoded.saw_complete);
        assert!(decoded.is_terminal());
        assert_eq!(decoded.cleaned_text, "partial done\n\n[Program finished]");
    }

    #[test]
    fn test_only_first_occurrence_is_rewritten() {
        let decoded = decode("a[NEEDS_INPUT]b[NEEDS_INPUT]");
        assert_eq!(decoded.cleaned_text, "ab[NEEDS_INPUT]");
    }
}
