//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ConsoleProgress;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;
use switchboard_application::{ChatGateway, ChatSession, DispatchError};
use switchboard_domain::{Query, TargetMode};

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    /// Switch the target for the following questions
    Model(TargetMode),
    /// `/model` with a missing or unknown argument
    InvalidModel(String),
    Models,
    History,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        match command {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/models" => ReplCommand::Models,
            "/history" => ReplCommand::History,
            "/model" | "/m" => match parts.next() {
                Some(name) => match name.parse() {
                    Ok(target) => ReplCommand::Model(target),
                    Err(_) => ReplCommand::InvalidModel(name.to_string()),
                },
                None => ReplCommand::InvalidModel(String::new()),
            },
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl<G: ChatGateway + 'static> {
    session: Arc<ChatSession<G>>,
    target: TargetMode,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl<G: ChatGateway + 'static> ChatRepl<G> {
    /// Create a new ChatRepl
    pub fn new(session: Arc<ChatSession<G>>, target: TargetMode) -> Self {
        Self {
            session,
            target,
            show_progress: true,
            history_path: ReplConfig::default().history_path(),
        }
    }

    /// Apply the `[repl]` settings
    pub fn with_config(mut self, config: &ReplConfig) -> Self {
        self.show_progress = config.show_progress;
        self.history_path = config.history_path();
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(&format!("{}> ", self.target));

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(line);

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = self.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("LLM Switchboard - Chat Mode"));
        println!();
        println!("Target: {}", self.target);
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /model <name>     - Switch target (all, llama3, mixtral, tinyllama)");
        println!("  /models           - Show available targets");
        println!("  /history          - Show this conversation");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
        println!("Press Ctrl+C while waiting to cancel the question in flight.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
            }
            ReplCommand::Model(target) => {
                self.target = target;
                println!("Target set to {}", target);
            }
            ReplCommand::InvalidModel(name) if name.is_empty() => {
                println!("Usage: /model <all|llama3|mixtral|tinyllama>");
            }
            ReplCommand::InvalidModel(name) => {
                println!("Unknown model: {}", name);
                println!("Type /models for available targets");
            }
            ReplCommand::Models => {
                println!();
                println!("{}", ConsoleFormatter::format_targets(&self.target));
            }
            ReplCommand::History => {
                let messages = self.session.messages();
                println!();
                if messages.is_empty() {
                    println!("No messages yet.");
                } else {
                    println!(
                        "{}",
                        ConsoleFormatter::indent(&ConsoleFormatter::format_messages(&messages), "  ")
                    );
                }
                println!();
            }
            ReplCommand::Unknown(line) => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_question(&self, question: &str) {
        let query = match Query::try_new(question, self.target) {
            Ok(query) => query,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };

        println!();

        let progress = ConsoleProgress::new(self.show_progress);

        let submit = self.session.submit(query, &progress);
        tokio::pin!(submit);

        let outcome = tokio::select! {
            outcome = &mut submit => outcome,
            _ = tokio::signal::ctrl_c() => {
                self.session.cancel();
                submit.await
            }
        };

        match outcome {
            Ok(messages) => {
                println!("{}", ConsoleFormatter::format_messages(&messages));
            }
            Err(DispatchError::Cancelled) => {
                println!("Cancelled.");
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_domain::Backend;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/models"), ReplCommand::Models);
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
    }

    #[test]
    fn test_parse_model_switch() {
        assert_eq!(
            ReplCommand::parse("/model tinyllama"),
            ReplCommand::Model(TargetMode::Single(Backend::TinyLlama))
        );
        assert_eq!(ReplCommand::parse("/model all"), ReplCommand::Model(TargetMode::All));
        assert_eq!(
            ReplCommand::parse("/model gpt4"),
            ReplCommand::InvalidModel("gpt4".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/model"),
            ReplCommand::InvalidModel(String::new())
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            ReplCommand::parse("/frobnicate now"),
            ReplCommand::Unknown("/frobnicate now".to_string())
        );
    }
}
