use anyhow::{Context, Result};
use colored::Colorize;
use simrun_core::LanguageId;
use simrun_core::execution::ExecutionOrchestrator;
use std::path::Path;

use super::utils;

/// Formats `file`, printing the result or rewriting the file in place.
pub async fn execute(file: &Path, language: Option<LanguageId>, write: bool) -> Result<bool> {
    let language = utils::resolve_language(language, file)?;
    let source = utils::read_source(file)?;

    let client = utils::build_client().await?;
    let mut orchestrator = ExecutionOrchestrator::new(client, language, source);
    utils::spawn_progress(orchestrator.subscribe());

    if !orchestrator.format_code().await {
        eprintln!("{}", "Nothing to format.".bright_black());
        return Ok(true);
    }
    if orchestrator.flags().error {
        eprintln!("{}", orchestrator.manual_output().red());
        return Ok(false);
    }

    if write {
        std::fs::write(file, orchestrator.source_code())
            .with_context(|| format!("Failed to write {}", file.display()))?;
        println!("{}", format!("Formatted {}", file.display()).green());
    } else {
        print!("{}", orchestrator.source_code());
        if !orchestrator.source_code().ends_with('\n') {
            println!();
        }
    }
    Ok(true)
}
