//! Console output formatter for display messages

use colored::Colorize;
use switchboard_domain::{Backend, DisplayMessage, OutputFormat, TargetMode};

/// Formats display messages for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for everything formatted afterwards
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format messages in the requested output format
    pub fn render(messages: &[DisplayMessage], format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format_messages(messages),
            OutputFormat::Json => Self::format_json(messages),
        }
    }

    /// Format a run of messages, one block each
    pub fn format_messages(messages: &[DisplayMessage]) -> String {
        messages
            .iter()
            .map(Self::format_message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a single message
    pub fn format_message(message: &DisplayMessage) -> String {
        let mut output = String::new();

        if message.is_user() {
            output.push_str(&format!("{} {}\n", "You:".cyan().bold(), message.content));
            return output;
        }

        let label = message.model_label.as_deref().unwrap_or("assistant");
        let title = format!("── {} ──", label);
        if message.is_error {
            output.push_str(&format!("{}\n", title.red().bold()));
        } else {
            output.push_str(&format!("{}\n", title.yellow().bold()));
        }

        if let Some(meta) = &message.meta {
            output.push_str(&format!(
                "{}\n",
                format!("intent: {} | source: {}", meta.intent, meta.source).dimmed()
            ));
        }

        if message.is_error {
            output.push_str(&format!("{} {}\n", "Error:".red(), message.content));
        } else {
            output.push_str(&message.content);
            output.push('\n');
        }

        output
    }

    /// Format as JSON
    pub fn format_json(messages: &[DisplayMessage]) -> String {
        serde_json::to_string_pretty(messages).unwrap_or_else(|_| "[]".to_string())
    }

    /// The backend list shown by `/models`, marking the current target
    pub fn format_targets(current: &TargetMode) -> String {
        let marker = |selected: bool| {
            if selected {
                "*".green().bold().to_string()
            } else {
                " ".to_string()
            }
        };

        let mut output = format!("{}\n", "Targets:".cyan().bold());
        output.push_str(&format!(
            "  {} {:<10} every model via /api/chat\n",
            marker(current.is_all()),
            "all"
        ));
        for backend in Backend::ALL {
            output.push_str(&format!(
                "  {} {:<10} {}\n",
                marker(*current == TargetMode::Single(backend)),
                backend.as_str(),
                backend.label()
            ));
        }
        output
    }

    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
