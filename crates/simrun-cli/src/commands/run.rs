use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use simrun_core::LanguageId;
use simrun_core::execution::{ExecutionMode, ExecutionOrchestrator, InteractiveState, SimulationClient};
use std::collections::VecDeque;
use std::path::Path;

use super::utils;

/// Runs `file` and reports whether it finished without the error flag.
pub async fn execute(
    file: &Path,
    language: Option<LanguageId>,
    mode: ExecutionMode,
    input: Option<&str>,
) -> Result<bool> {
    let language = utils::resolve_language(language, file)?;
    let source = utils::read_source(file)?;
    let input_blob = input.map(utils::read_input_blob).transpose()?;

    let client = utils::build_client().await?;
    let mut orchestrator = ExecutionOrchestrator::new(client, language, source);
    orchestrator.set_mode(mode);
    utils::spawn_progress(orchestrator.subscribe());

    match mode {
        ExecutionMode::Manual => {
            if let Some(blob) = input_blob {
                orchestrator.set_manual_input(blob);
            }
            orchestrator.run().await;
            print!("{}", orchestrator.manual_output());
            if !orchestrator.manual_output().ends_with('\n') {
                println!();
            }
        }
        ExecutionMode::Interactive => {
            let scripted = input_blob
                .map(|blob| blob.lines().map(str::to_string).collect())
                .unwrap_or_default();
            run_interactive(&mut orchestrator, scripted).await?;
        }
    }

    Ok(!orchestrator.flags().error)
}

/// Drives an interactive run, answering prompts from `scripted` first and
/// then from the terminal.
async fn run_interactive<C: SimulationClient>(
    orchestrator: &mut ExecutionOrchestrator<C>,
    mut scripted: VecDeque<String>,
) -> Result<()> {
    orchestrator.run().await;
    let mut seen = print_new(orchestrator, 0);

    let mut editor: Option<DefaultEditor> = None;
    while orchestrator.is_waiting_for_input() {
        let line = match scripted.pop_front() {
            Some(line) => {
                println!("{}", format!("> {}", line).green());
                line
            }
            None => {
                if editor.is_none() {
                    editor = Some(DefaultEditor::new()?);
                }
                let Some(rl) = editor.as_mut() else {
                    break;
                };
                match rl.readline("stdin> ") {
                    Ok(line) => line,
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        eprintln!("{}", "Input closed; abandoning the run.".yellow());
                        break;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        };

        if !orchestrator.supply_input(&line).await {
            eprintln!("{}", "Empty input ignored.".bright_black());
            continue;
        }
        // Scripted answers are echoed above; only show what the program printed.
        seen = print_new(orchestrator, seen + 1);
    }

    if orchestrator.state() == InteractiveState::Stalled {
        eprintln!(
            "{}",
            "The simulation stopped without reporting completion.".yellow()
        );
    }
    Ok(())
}

fn print_new<C: SimulationClient>(orchestrator: &ExecutionOrchestrator<C>, seen: usize) -> usize {
    utils::print_entries(orchestrator.transcript().since(seen));
    orchestrator.transcript().len()
}
