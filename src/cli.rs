use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

#[derive(Parser)]
#[command(
    name = "persona",
    about = "Inspect the persona: recent improvements, identity documents and chat history",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/persona/logs/persona.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to persona.yaml config file")]
    pub config: Option<PathBuf>,

    /// Directory holding the persona documents and ledgers
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the self view: branch, recent improvements, identity documents
    Status {
        /// Output format
        #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show recent chat exchanges
    History {
        /// Number of exchanges
        #[arg(long, short = 'n', default_value = "5")]
        count: usize,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Chat entry point: `chat-self [message...]`
#[derive(Parser)]
#[command(
    name = "chat-self",
    about = "Send a message to the agent wrapped in the persona documents",
    version = env!("GIT_DESCRIBE"),
    after_help = "Without a message, prompts for one line on stdin.\nUse `--` before a message that starts with a dash, e.g. `chat-self -- -r is a flag?`\n\nLogs are written to: ~/.local/share/persona/logs/persona.log"
)]
pub struct ChatCli {
    /// Path to config file
    #[arg(short, long, help = "Path to persona.yaml config file")]
    pub config: Option<PathBuf>,

    /// Directory holding the persona documents and ledgers
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Message words, joined with spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,
}
