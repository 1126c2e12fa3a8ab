//! REPL (Read-Eval-Print Loop) for interactive diagram chat

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use flowgrid_application::{
    GenerateDiagramError, GenerateDiagramUseCase, GenerationProgress, NoProgress,
};
use flowgrid_domain::{
    DomainError, GenerationRequest, GenerationResult, MERMAID_FENCE_TAG, Message,
};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use thiserror::Error;

const HISTORY_CAPACITY: usize = 500;

/// Errors for a single chat turn; the session continues after either.
#[derive(Debug, Error)]
pub enum ChatTurnError {
    #[error(transparent)]
    Request(#[from] DomainError),

    #[error(transparent)]
    Generation(#[from] GenerateDiagramError),
}

/// Interactive chat REPL
///
/// Keeps the running conversation so follow-ups ("add an error branch")
/// refine the previous diagram.
pub struct ChatRepl {
    use_case: GenerateDiagramUseCase,
    history: Vec<Message>,
    last_result: Option<GenerationResult>,
    show_progress: bool,
    output: OutputFormat,
}

impl ChatRepl {
    pub fn new(use_case: GenerateDiagramUseCase) -> Self {
        Self {
            use_case,
            history: Vec::new(),
            last_result: None,
            show_progress: true,
            output: OutputFormat::Text,
        }
    }

    /// Start from prior turns (e.g. `--history`)
    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("flowgrid").join("history.txt"));
        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                editor = editor.with_history(Box::new(history));
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("flowgrid".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            FlowGrid - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.use_case.params().model);
        if !self.history.is_empty() {
            println!("Continuing with {} prior turns", self.history.len());
        }
        println!();
        println!("Describe the diagram you want. Commands:");
        println!("  /help     - Show this help");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /diagram         - Print the last diagram code");
                println!("  /history         - Show the conversation so far");
                println!("  /clear           - Start a new conversation");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/diagram" => {
                match self.last_result.as_ref().filter(|r| r.has_diagram()) {
                    Some(result) => println!("{}", result.diagram_text),
                    None => println!("No diagram yet."),
                }
                false
            }
            "/history" => {
                println!();
                for message in &self.history {
                    let first_line = message.content.lines().next().unwrap_or("");
                    println!("  {:>9}: {}", message.role.to_string().dimmed(), first_line);
                }
                println!("  ({} turns)", self.history.len());
                println!();
                false
            }
            "/clear" => {
                self.history.clear();
                self.last_result = None;
                println!("Conversation cleared.");
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_message(&mut self, message: &str) {
        println!();
        match self.send(message).await {
            Ok(result) => println!("{}", ConsoleFormatter::render(&result, self.output)),
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
        println!();
    }

    /// Generate one turn and append it to the conversation on success.
    pub async fn send(&mut self, message: &str) -> Result<GenerationResult, ChatTurnError> {
        let request = GenerationRequest::new(message, self.history.clone())?;

        let reporter = ProgressReporter::new();
        let progress: &dyn GenerationProgress = if self.show_progress {
            &reporter
        } else {
            &NoProgress
        };
        let result = self
            .use_case
            .execute_with_progress(&request, progress)
            .await?;

        self.history.push(Message::user(request.user_message()));
        self.history.push(assistant_turn(&result));
        self.last_result = Some(result.clone());

        Ok(result)
    }
}

/// The assistant message recorded for a finished turn.
///
/// The diagram is fenced back into the reply so later turns can edit it.
pub fn assistant_turn(result: &GenerationResult) -> Message {
    if result.has_diagram() {
        Message::assistant(format!(
            "{}\n\n```{}\n{}\n```",
            result.reply_text, MERMAID_FENCE_TAG, result.diagram_text
        ))
    } else {
        Message::assistant(result.reply_text.clone())
    }
}
