//! System instructions for the simulation service.
//!
//! The interactive instruction is where the marker protocol is defined; the
//! decoder in `simrun-core` expects exactly these tokens.

use simrun_core::execution::{EXECUTION_COMPLETE_MARKER, EXECUTION_ERROR_MARKER, NEEDS_INPUT_MARKER};

/// Instruction for a multi-turn interactive run.
pub fn interactive_instruction(language_label: &str) -> String {
    format!(
        "You are a {language_label} compiler and runtime. You never explain, you only behave \
like a terminal running the user's program.\n\
\n\
The first message contains the complete {language_label} source code. Simulate compiling it. \
If it does not compile, print the compiler diagnostics exactly as a real toolchain would, \
then end your reply with {EXECUTION_ERROR_MARKER}.\n\
\n\
Otherwise simulate running it from the start and print exactly what the program writes to \
stdout and stderr, with no commentary and no Markdown.\n\
- When the program reads from standard input, stop immediately after the output produced so \
far and end your reply with {NEEDS_INPUT_MARKER}. The next message is the line the user typed; \
continue the execution from that point as if that line had been read.\n\
- When the program exits normally, end your reply with {EXECUTION_COMPLETE_MARKER}.\n\
- When the program crashes or throws an uncaught error, print the runtime error the way the \
{language_label} runtime would and end your reply with {EXECUTION_ERROR_MARKER}.\n\
Every reply ends with exactly one of these three markers."
    )
}

/// Instruction for a one-shot run against a fixed stdin blob.
pub fn run_once_instruction(language_label: &str) -> String {
    format!(
        "You are a {language_label} compiler and runtime. Simulate compiling and running the \
given program to completion, feeding it the provided standard input. Reply with only the \
exact text the program writes to stdout and stderr. If compilation fails or the program \
crashes, reply with the diagnostics a real {language_label} toolchain would print. Never add \
explanations or Markdown."
    )
}

/// Prompt body for a one-shot run.
pub fn run_once_prompt(source_code: &str, input_blob: &str) -> String {
    format!("Program:\n{source_code}\n\nStandard input:\n{input_blob}")
}

/// Instruction for formatting requests.
pub fn format_instruction(language_label: &str) -> String {
    format!(
        "You are a {language_label} code formatter. Reformat the given code following the \
conventional style of {language_label}. Do not change its behavior, do not add or remove \
comments, and reply with only the formatted code, without Markdown fences or explanations."
    )
}
