use anyhow::{Context, Result, bail};
use colored::Colorize;
use simrun_core::LanguageId;
use simrun_core::execution::{EntryKind, ExecutionSnapshot, TranscriptEntry};
use simrun_interaction::GeminiSimulationClient;
use std::io::Read;
use std::path::Path;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// program output on stdout.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log level '{}'", default_filter))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

/// Picks the explicit language, or infers one from the file extension.
pub fn resolve_language(explicit: Option<LanguageId>, path: &Path) -> Result<LanguageId> {
    if let Some(language) = explicit {
        return Ok(language);
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    match LanguageId::from_extension(extension) {
        Some(language) => Ok(language),
        None => bail!(
            "Cannot infer the language of {}; pass --language ({})",
            path.display(),
            LanguageId::all()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads an input blob from a file, or from stdin when `source` is `-`.
pub fn read_input_blob(source: &str) -> Result<String> {
    if source == "-" {
        let mut blob = String::new();
        std::io::stdin()
            .read_to_string(&mut blob)
            .context("Failed to read standard input")?;
        return Ok(blob);
    }
    read_source(Path::new(source))
}

pub async fn build_client() -> Result<GeminiSimulationClient> {
    let client = GeminiSimulationClient::try_from_env().await?;
    tracing::debug!("[CLI] Using model {}", client.model());
    Ok(client)
}

pub fn print_entries(entries: &[TranscriptEntry]) {
    for entry in entries {
        match entry.kind {
            EntryKind::Stdout => println!("{}", entry.content),
            EntryKind::Stdin => println!("{}", format!("> {}", entry.content).green()),
        }
    }
}

/// Prints a pending indicator on stderr each time a request goes in flight.
///
/// The task ends when the orchestrator owning the sender is dropped.
pub fn spawn_progress(mut snapshots: watch::Receiver<ExecutionSnapshot>) {
    tokio::spawn(async move {
        let mut was_busy = false;
        while snapshots.changed().await.is_ok() {
            let flags = snapshots.borrow_and_update().flags;
            if flags.is_busy() && !was_busy {
                let label = if flags.format_pending {
                    "formatting..."
                } else {
                    "simulating..."
                };
                eprintln!("{}", label.bright_black());
            }
            was_busy = flags.is_busy();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_language_prefers_explicit() {
        let language = resolve_language(Some(LanguageId::Go), Path::new("main.py")).unwrap();
        assert_eq!(language, LanguageId::Go);
    }

    #[test]
    fn test_resolve_language_from_extension() {
        assert_eq!(
            resolve_language(None, Path::new("src/app.ts")).unwrap(),
            LanguageId::Typescript
        );
        assert!(resolve_language(None, Path::new("notes.txt")).is_err());
        assert!(resolve_language(None, Path::new("Makefile")).is_err());
    }

    #[test]
    fn test_read_input_blob_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "3\n1 2 3\n").unwrap();

        let blob = read_input_blob(path.to_str().unwrap()).unwrap();
        assert_eq!(blob, "3\n1 2 3\n");
        assert!(read_input_blob(dir.path().join("missing").to_str().unwrap()).is_err());
    }
}
