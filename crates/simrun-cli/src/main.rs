use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use simrun_core::LanguageId;
use simrun_core::execution::ExecutionMode;

mod commands;

#[derive(Parser)]
#[command(name = "simrun")]
#[command(about = "simrun - run code through a simulated execution service", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "info", "simrun_core=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a source file
    Run {
        /// Source file to run
        file: PathBuf,
        /// Language id or alias; inferred from the file extension when omitted
        #[arg(short, long)]
        language: Option<LanguageId>,
        /// interactive (answer prompts as they come) or manual (one-shot with --input)
        #[arg(short, long, default_value_t = ExecutionMode::Interactive)]
        mode: ExecutionMode,
        /// Standard input file ("-" for stdin). In interactive mode its lines
        /// answer the first prompts.
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Format a source file
    Format {
        file: PathBuf,
        #[arg(short, long)]
        language: Option<LanguageId>,
        /// Rewrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,
    },
    /// Start the interactive editor shell
    Shell,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    commands::utils::init_tracing(&cli.log_level)?;

    let succeeded = match cli.command {
        Commands::Run {
            file,
            language,
            mode,
            input,
        } => commands::run::execute(&file, language, mode, input.as_deref()).await?,
        Commands::Format {
            file,
            language,
            write,
        } => commands::format::execute(&file, language, write).await?,
        Commands::Shell => commands::shell::execute().await?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
