//! Error types for the chat pipeline
//!
//! The `Display` output of each variant is the one-line diagnostic printed on
//! stderr by the entry points.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of a single chat invocation
#[derive(Debug, Error)]
pub enum PersonaError {
    /// A required persona document does not exist
    #[error("Missing file: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The user message was empty after trimming
    #[error("Error: user message is empty.")]
    EmptyMessage,

    /// The external agent failed or could not be launched
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// A document exists but could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The exchange could not be written to the ledger
    #[error("Failed to append to ledger {}: {source}", path.display())]
    Ledger {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the external agent process
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent program '{program}' not found on PATH")]
    NotFound { program: String },

    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit with diagnostic text on stderr
    #[error("{message}")]
    Failed { message: String },

    /// Exit 0 but stdout was not text
    #[error("agent reply is not valid UTF-8: {source}")]
    InvalidOutput {
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Non-zero exit with nothing on stderr
    #[error("agent exited with code {code}")]
    ExitCode { code: i32 },
}

/// The single stderr line for a failed command
///
/// Domain errors already read as a diagnostic; anything else gets its cause chain.
pub fn diagnostic(err: &eyre::Report) -> String {
    if err.downcast_ref::<PersonaError>().is_some() {
        err.to_string()
    } else {
        format!("Error: {:#}", err)
    }
}
