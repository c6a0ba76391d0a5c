//! Chat history ledger
//!
//! Every successful exchange is appended as one JSON object per line.
//! The writer never reads or rewrites the file; readers skip anything that
//! does not parse to a JSON object, including a half-written trailing line.

use chrono::{SecondsFormat, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::PersonaError;

/// A single chat exchange as stored in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// UTC, RFC 3339
    pub timestamp: String,
    #[serde(rename = "user")]
    pub user_message: String,
    /// Full composed prompt sent to the agent
    #[serde(rename = "system")]
    pub system_prompt: String,
    pub reply: String,
}

impl Exchange {
    /// Create an exchange stamped with the current UTC time
    pub fn new(user_message: &str, system_prompt: &str, reply: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            user_message: user_message.to_string(),
            system_prompt: system_prompt.to_string(),
            reply: reply.to_string(),
        }
    }

    /// Serialize as a single compact JSON line, newline included
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Records surviving a ledger read, plus how many lines were dropped
#[derive(Debug, Default)]
pub struct LedgerRead {
    pub records: Vec<Map<String, Value>>,
    /// Lines that were not valid UTF-8, not valid JSON, or not an object
    pub skipped: usize,
}

/// Append-only JSONL ledger
pub struct HistoryLedger {
    path: PathBuf,
}

impl HistoryLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one exchange
    ///
    /// The line goes out in a single write on an append-mode handle, so
    /// concurrent writers interleave whole lines but are not ordered.
    pub fn append(&self, user_message: &str, system_prompt: &str, reply: &str) -> Result<Exchange, PersonaError> {
        let exchange = Exchange::new(user_message, system_prompt, reply);
        let line = exchange.to_line().map_err(|e| self.ledger_error(e.into()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.ledger_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.ledger_error(e))?;
        file.write_all(line.as_bytes()).map_err(|e| self.ledger_error(e))?;

        log::info!("Appended exchange to {}", self.path.display());
        Ok(exchange)
    }

    /// The last `count` exchanges, oldest first
    ///
    /// Records that are objects but lack the exchange fields are counted as skipped.
    pub fn recent(&self, count: usize) -> Result<(Vec<Exchange>, usize)> {
        let LedgerRead { records, mut skipped } = scan(&self.path)?;

        let mut exchanges = Vec::new();
        for record in records {
            match serde_json::from_value::<Exchange>(Value::Object(record)) {
                Ok(exchange) => exchanges.push(exchange),
                Err(_) => skipped += 1,
            }
        }

        let start = exchanges.len().saturating_sub(count);
        Ok((exchanges.split_off(start), skipped))
    }

    fn ledger_error(&self, source: std::io::Error) -> PersonaError {
        PersonaError::Ledger {
            path: self.path.clone(),
            source,
        }
    }
}

/// Read the last `count` JSON objects from a JSONL file, in file order
///
/// A missing file is an empty ledger. Blank lines and `#` comments are ignored.
pub fn read_last(path: &Path, count: usize) -> Result<LedgerRead> {
    let mut read = scan(path)?;
    let start = read.records.len().saturating_sub(count);
    read.records.drain(..start);

    if read.skipped > 0 {
        log::warn!("Skipped {} malformed line(s) in {}", read.skipped, path.display());
    }
    Ok(read)
}

fn scan(path: &Path) -> Result<LedgerRead> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("Ledger not found: {}", path.display());
            return Ok(LedgerRead::default());
        }
        Err(e) => return Err(e).context(format!("Failed to open ledger {}", path.display())),
    };

    let mut read = LedgerRead::default();
    for raw in BufReader::new(file).split(b'\n') {
        let raw = raw.context(format!("Failed to read ledger {}", path.display()))?;

        let Ok(line) = String::from_utf8(raw) else {
            read.skipped += 1;
            continue;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => read.records.push(map),
            _ => read.skipped += 1,
        }
    }

    Ok(read)
}
