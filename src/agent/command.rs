//! Agent backed by a child process
//!
//! Runs `<program> agent --agent <name> --message <prompt>` and captures stdout.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::Agent;
use crate::config::AgentConfig;
use crate::error::AgentError;

/// Agent executed as `<program> agent --agent <name> --message <prompt>`
#[derive(Debug, Clone)]
pub struct CommandAgent {
    program: String,
    name: String,
}

impl CommandAgent {
    pub fn new(program: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            name: name.into(),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.program.clone(), config.name.clone())
    }

    fn resolve_program(&self) -> Result<PathBuf, AgentError> {
        which::which(&self.program).map_err(|_| AgentError::NotFound {
            program: self.program.clone(),
        })
    }

    /// Arguments passed after the program name
    fn args<'a>(&'a self, prompt: &'a str) -> [&'a str; 5] {
        ["agent", "--agent", self.name.as_str(), "--message", prompt]
    }
}

impl Agent for CommandAgent {
    fn invoke(&self, prompt: &str) -> Result<String, AgentError> {
        let program = self.resolve_program()?;
        log::info!(
            "Invoking agent {} (--agent {}, prompt {} bytes)",
            program.display(),
            self.name,
            prompt.len()
        );

        let output = Command::new(&program)
            .args(self.args(prompt))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| AgentError::Launch {
                program: self.program.clone(),
                source,
            })?;

        // Killed by a signal has no code
        let exit_code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            log::error!("Agent exited with code {}: {}", exit_code, stderr);
            return Err(if stderr.is_empty() {
                AgentError::ExitCode { code: exit_code }
            } else {
                AgentError::Failed { message: stderr }
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|source| {
            log::error!("Agent reply is not valid UTF-8: {}", source);
            AgentError::InvalidOutput { source }
        })?;

        log::info!("Agent replied with {} bytes", stdout.len());
        Ok(stdout)
    }
}
