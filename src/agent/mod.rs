//! External agent invocation
//!
//! The agent is an opaque subprocess. [`Agent`] is the seam tests use to
//! substitute a fake without spawning anything.

pub mod command;

pub use command::CommandAgent;

use crate::error::AgentError;

/// Something that turns a composed prompt into a reply
pub trait Agent {
    /// Generate a reply for the prompt
    ///
    /// Blocks until the agent finishes; there is no timeout.
    fn invoke(&self, prompt: &str) -> Result<String, AgentError>;
}
