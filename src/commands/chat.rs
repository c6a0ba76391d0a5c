//! Chat command
//!
//! Loads the persona documents, wraps the user's message in them, asks the
//! agent for a reply, prints it, and appends the exchange to the ledger.
//! Nothing is written to the ledger unless every earlier step succeeded.

use eyre::{Context, Result};
use std::io::{BufRead, Write};

use crate::agent::Agent;
use crate::config::Config;
use crate::error::PersonaError;
use crate::history::{Exchange, HistoryLedger};
use crate::persona::{compose, load_document, normalize_message, validate_message};

/// Run one chat exchange against the given agent
///
/// `message` holds the command-line words; when empty a single line is read
/// from `input` after printing a prompt to `output`.
pub fn run<A, R, W>(message: &[String], config: &Config, agent: &A, input: &mut R, output: &mut W) -> Result<Exchange>
where
    A: Agent + ?Sized,
    R: BufRead,
    W: Write,
{
    let personality = load_document(&config.personality_path())?;
    let boundaries = load_document(&config.boundaries_path())?;

    let raw_message = if message.is_empty() {
        read_message(input, output)?
    } else {
        normalize_message(message)
    };
    let user_message = validate_message(&raw_message)?;

    let system_prompt = compose(&personality.text, &boundaries.text, user_message);
    log::debug!(
        "Composed prompt from {} and {} ({} bytes)",
        personality.path.display(),
        boundaries.path.display(),
        system_prompt.len()
    );

    let reply = agent.invoke(&system_prompt).map_err(PersonaError::Agent)?;

    write_reply(output, &reply).context("Failed to write reply")?;

    let ledger = HistoryLedger::new(config.chat_history_path());
    let exchange = ledger.append(user_message, &system_prompt, &reply)?;
    Ok(exchange)
}

fn read_message<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Message: ").context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read message")?;
    Ok(line.trim().to_string())
}

/// Print the reply with exactly one trailing newline; the stored reply is untouched
fn write_reply<W: Write>(output: &mut W, reply: &str) -> std::io::Result<()> {
    writeln!(output, "{}", reply.trim_end_matches(['\r', '\n']))?;
    output.flush()
}
