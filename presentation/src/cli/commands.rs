//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use switchboard_domain::TargetMode;

/// Output format for dispatch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable messages
    Text,
    /// The display messages as a JSON array
    Json,
}

impl From<OutputFormat> for switchboard_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => switchboard_domain::OutputFormat::Text,
            OutputFormat::Json => switchboard_domain::OutputFormat::Json,
        }
    }
}

fn parse_target(value: &str) -> Result<TargetMode, String> {
    value.parse().map_err(|e: switchboard_domain::DomainError| e.to_string())
}

/// CLI arguments for llm-switchboard
#[derive(Parser, Debug)]
#[command(name = "llm-switchboard")]
#[command(author, version, about = "Ask one or all of the llama3, mixtral and tinyllama backends")]
#[command(long_about = r#"
llm-switchboard sends a question to a model backend and prints the replies.

Targets:
  all        One call to /api/chat; the backend asks every model and may
             attach a dataset match (default)
  llama3     Only /api/llama3
  mixtral    Only /api/mixtral
  tinyllama  Only /api/tinyllama

Configuration files are loaded from (in priority order):
1. SWITCHBOARD_API_URL and SWITCHBOARD_<SECTION>__<KEY> environment variables
2. --config <path>           Explicit config file
3. ./switchboard.toml        Project-level config
4. ~/.config/llm-switchboard/config.toml   Global config

Example:
  llm-switchboard "What is a deductible?"
  llm-switchboard -m mixtral "Explain copays in one sentence"
  llm-switchboard --chat --api-url http://localhost:5000
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Target: all, llama3, mixtral or tinyllama
    #[arg(short, long, value_name = "MODEL", value_parser = parse_target)]
    pub model: Option<TargetMode>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Base URL of the backend API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Ask every model from this client instead of through /api/chat
    #[arg(long)]
    pub fan_out: bool,

    /// Append a JSONL transcript of every dispatch to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
