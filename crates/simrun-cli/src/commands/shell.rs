//! `simrun shell`: a line-oriented editor around one orchestrator.
//!
//! Slash commands edit and run the buffer; any other line is program input
//! while the program waits for it. The buffer and language are restored on
//! start and saved whenever they change.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use simrun_core::LanguageId;
use simrun_core::editor::{EditorStateRepository, restore_code, restore_language};
use simrun_core::execution::{ExecutionMode, ExecutionOrchestrator, SimulationClient};
use simrun_infrastructure::TomlEditorStateRepository;

use super::utils;

const COMMANDS: &[(&str, &str)] = &[
    ("/lang", "<id>      switch language (restores that language's buffer)"),
    ("/mode", "<mode>    interactive | manual"),
    ("/load", "<file>    replace the buffer with a file"),
    ("/show", "          print the buffer"),
    ("/run", "           run the buffer"),
    ("/format", "        format the buffer"),
    ("/input", "<text>   set the manual-mode input (\\n for newlines)"),
    ("/clear", "         empty the buffer and the output"),
    ("/help", "          show this help"),
    ("/quit", "          exit"),
    ("//", "<text>      send program input that starts with '/'"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Lang(String),
    Mode(String),
    Load(PathBuf),
    Show,
    Run,
    Format,
    Input(String),
    Clear,
    Help,
    Quit,
    /// Not a slash command: program input.
    Text(String),
    Unknown(String),
}

impl ShellCommand {
    /// Program input is kept verbatim; `//` sends a line starting with `/`.
    fn parse(line: &str) -> Self {
        if let Some(escaped) = line.strip_prefix("//") {
            return Self::Text(format!("/{escaped}"));
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Text(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim_end(), ""),
        };

        match name {
            "lang" => Self::Lang(arg.to_string()),
            "mode" => Self::Mode(arg.to_string()),
            "load" => Self::Load(PathBuf::from(arg)),
            "show" => Self::Show,
            "run" => Self::Run,
            "format" => Self::Format,
            "input" => Self::Input(arg.replace("\\n", "\n")),
            "clear" => Self::Clear,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS
                .iter()
                .map(|(name, _)| name.to_string())
                .filter(|name| name != "//")
                .collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(prefix) = line.strip_prefix("/lang ") {
            let start = line.len() - prefix.len();
            let candidates = LanguageId::all()
                .map(|id| id.as_str())
                .filter(|id| id.starts_with(prefix))
                .map(|id| Pair {
                    display: id.to_string(),
                    replacement: id.to_string(),
                })
                .collect();
            return Ok((start, candidates));
        }

        if line.starts_with('/') && !line.contains(' ') {
            let candidates = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// REPL state: the orchestrator plus how much of the transcript is on screen.
struct Shell<C: SimulationClient> {
    orchestrator: ExecutionOrchestrator<C>,
    repository: TomlEditorStateRepository,
    seen: usize,
}

impl<C: SimulationClient> Shell<C> {
    /// Returns `false` when the shell should exit.
    async fn handle(&mut self, command: ShellCommand) -> Result<bool> {
        match command {
            ShellCommand::Lang(arg) => match arg.parse::<LanguageId>() {
                Ok(language) => self.switch_language(language, None).await,
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            ShellCommand::Mode(arg) => match arg.parse::<ExecutionMode>() {
                Ok(mode) => {
                    if self.orchestrator.set_mode(mode) {
                        self.seen = 0;
                    }
                    println!("{}", format!("Mode: {}", mode).bright_black());
                }
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            ShellCommand::Load(path) => match utils::read_source(&path) {
                Ok(code) => {
                    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
                    match LanguageId::from_extension(extension) {
                        Some(language) if language != self.orchestrator.language() => {
                            self.switch_language(language, Some(code)).await;
                        }
                        _ => {
                            self.orchestrator.set_source_code(code);
                            self.save_code().await;
                        }
                    }
                    println!("{}", format!("Loaded {}", path.display()).bright_black());
                }
                Err(e) => eprintln!("{}", format!("{:#}", e).red()),
            },
            ShellCommand::Show => self.show(),
            ShellCommand::Run => {
                self.seen = 0;
                self.orchestrator.run().await;
                self.render();
            }
            ShellCommand::Format => {
                if self.orchestrator.format_code().await {
                    if self.orchestrator.flags().error {
                        self.render();
                    } else {
                        self.save_code().await;
                        self.show();
                    }
                } else {
                    println!("{}", "Nothing to format.".bright_black());
                }
            }
            ShellCommand::Input(text) => {
                self.orchestrator.set_manual_input(text);
                println!("{}", "Manual input set.".bright_black());
            }
            ShellCommand::Clear => {
                self.orchestrator.clear();
                self.seen = 0;
                self.save_code().await;
            }
            ShellCommand::Help => print_help(),
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Text(text) => {
                if self.orchestrator.supply_input(&text).await {
                    // The typed line is already on screen.
                    self.seen += 1;
                    self.render();
                } else if !self.orchestrator.is_waiting_for_input() {
                    println!(
                        "{}",
                        "No program is waiting for input. Use /run to start one.".bright_black()
                    );
                }
            }
            ShellCommand::Unknown(name) => {
                eprintln!("{}", format!("Unknown command: /{} (try /help)", name).yellow());
            }
        }
        Ok(true)
    }

    /// Saves the current buffer, then loads `code` (or the saved buffer) for
    /// `language`.
    async fn switch_language(&mut self, language: LanguageId, code: Option<String>) {
        self.save_code().await;

        let code = match code {
            Some(code) => code,
            None => restore_code(&self.repository, language).await,
        };
        self.orchestrator.change_language(language, code);
        self.seen = 0;

        if let Err(e) = self.repository.save_language(language).await {
            tracing::warn!("[Shell] Failed to save language: {}", e);
        }
        if let Err(e) = self.repository.save_code(language, self.orchestrator.source_code()).await {
            tracing::warn!("[Shell] Failed to save code: {}", e);
        }
        println!("{}", format!("Language: {}", language.name()).bright_black());
    }

    async fn save_code(&self) {
        let language = self.orchestrator.language();
        if let Err(e) = self
            .repository
            .save_code(language, self.orchestrator.source_code())
            .await
        {
            tracing::warn!("[Shell] Failed to save code: {}", e);
        }
    }

    fn render(&mut self) {
        match self.orchestrator.mode() {
            ExecutionMode::Interactive => {
                utils::print_entries(self.orchestrator.transcript().since(self.seen));
                self.seen = self.orchestrator.transcript().len();
                if self.orchestrator.is_waiting_for_input() {
                    println!("{}", "(waiting for input)".bright_black());
                }
            }
            ExecutionMode::Manual => {
                let output = self.orchestrator.manual_output();
                if self.orchestrator.flags().error {
                    println!("{}", output.red());
                } else {
                    println!("{}", output);
                }
            }
        }
    }

    fn show(&self) {
        let code = self.orchestrator.source_code();
        if code.is_empty() {
            println!("{}", "(empty buffer)".bright_black());
            return;
        }
        for (number, line) in code.lines().enumerate() {
            println!("{} {}", format!("{:>4}", number + 1).bright_black(), line);
        }
    }

    fn prompt(&self) -> String {
        if self.orchestrator.is_waiting_for_input() {
            "stdin> ".to_string()
        } else {
            format!("{}:{}> ", self.orchestrator.language(), self.orchestrator.mode())
        }
    }
}

fn print_help() {
    for (name, description) in COMMANDS {
        println!("  {} {}", name.bright_cyan(), description.bright_black());
    }
}

pub async fn execute() -> Result<bool> {
    let repository = TomlEditorStateRepository::new(None)?;
    let language = restore_language(&repository).await;
    let code = restore_code(&repository, language).await;

    let client = utils::build_client().await?;
    let orchestrator = ExecutionOrchestrator::new(client, language, code);
    utils::spawn_progress(orchestrator.subscribe());

    let mut shell = Shell {
        orchestrator,
        repository,
        seen: 0,
    };

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== simrun shell ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Language: {}. Type /help for commands.", language.name()).bright_black()
    );
    println!();

    loop {
        match rl.readline(&shell.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if !shell.handle(ShellCommand::parse(&line)).await? {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(ShellCommand::parse("/lang py"), ShellCommand::Lang("py".into()));
        assert_eq!(ShellCommand::parse("/mode  manual "), ShellCommand::Mode("manual".into()));
        assert_eq!(
            ShellCommand::parse("/load src/main.go"),
            ShellCommand::Load(PathBuf::from("src/main.go"))
        );
        assert_eq!(ShellCommand::parse("/run"), ShellCommand::Run);
        assert_eq!(ShellCommand::parse("/exit"), ShellCommand::Quit);
        assert_eq!(ShellCommand::parse("/frob x"), ShellCommand::Unknown("frob".into()));
    }

    #[test]
    fn test_parse_input_expands_newlines() {
        assert_eq!(
            ShellCommand::parse("/input 3\\n1 2 3"),
            ShellCommand::Input("3\n1 2 3".into())
        );
    }

    #[test]
    fn test_plain_line_is_program_input() {
        assert_eq!(ShellCommand::parse("Ada"), ShellCommand::Text("Ada".into()));
        assert_eq!(ShellCommand::parse(" /run"), ShellCommand::Text(" /run".into()));
    }

    #[test]
    fn test_program_input_is_kept_verbatim() {
        assert_eq!(ShellCommand::parse("Ada  "), ShellCommand::Text("Ada  ".into()));
        assert_eq!(ShellCommand::parse("//etc/hosts"), ShellCommand::Text("/etc/hosts".into()));
        assert_eq!(ShellCommand::parse("/run  "), ShellCommand::Run);
    }

    #[test]
    fn test_helper_hints_command_suffix() {
        let helper = CliHelper::new();
        let history = rustyline::history::DefaultHistory::new();
        let ctx = Context::new(&history);

        assert_eq!(helper.hint("/fo", 3, &ctx).as_deref(), Some("rmat"));
        assert_eq!(helper.hint("hello", 5, &ctx), None);
    }
}
