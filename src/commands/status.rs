//! Self view status command
//!
//! Shows the current branch, the most recent improvement records and the head
//! of each identity document. Every section degrades to a placeholder line;
//! nothing here fails because an input is missing or malformed.

use colored::*;
use eyre::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::cli::OutputFormat;
use crate::config::{Config, StatusConfig};
use crate::history::read_last;

const UNAVAILABLE_BRANCH: &str = "unavailable";
const UNKNOWN_TIME: &str = "unknown-time";
const UNKNOWN_INTENT: &str = "unknown-intent";
const NO_HISTORY: &str = "(no memory history found)";
const MISSING: &str = "(missing)";
const EMPTY: &str = "(empty)";
const UNREADABLE: &str = "(unreadable)";

/// Source of the current branch name
pub trait BranchSource {
    /// `None` when the branch cannot be determined
    fn branch(&self) -> Option<String>;
}

/// Asks git for the branch checked out in a directory
pub struct GitBranch {
    repo_root: PathBuf,
}

impl GitBranch {
    pub fn new(repo_root: PathBuf) -> Self {
        Self { repo_root }
    }
}

impl BranchSource for GitBranch {
    fn branch(&self) -> Option<String> {
        let output = Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(&self.repo_root)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| log::debug!("git not available: {}", e))
            .ok()?;

        if !output.status.success() {
            log::debug!("git rev-parse exited with {}", output.status);
            return None;
        }

        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!branch.is_empty()).then_some(branch)
    }
}

/// Everything the status report shows
#[derive(Debug, Serialize)]
pub struct StatusSnapshot {
    pub branch: String,
    pub improvements: Vec<ImprovementRecord>,
    /// Memory ledger lines dropped as malformed
    pub skipped_records: usize,
    pub documents: Vec<DocumentPreview>,
}

/// A memory ledger record as displayed
#[derive(Debug, Serialize)]
pub struct ImprovementRecord {
    pub timestamp: String,
    pub intent: String,
    pub summary: String,
}

impl ImprovementRecord {
    fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            timestamp: field(record, "timestamp", UNKNOWN_TIME),
            intent: field(record, "intent", UNKNOWN_INTENT),
            summary: field(record, "summary", ""),
        }
    }
}

fn field(record: &Map<String, Value>, key: &str, placeholder: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => placeholder.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentState {
    Present,
    Missing,
    Empty,
    Unreadable,
}

/// The first lines of one identity document
#[derive(Debug, Serialize)]
pub struct DocumentPreview {
    pub name: String,
    pub state: DocumentState,
    pub lines: Vec<String>,
}

impl DocumentPreview {
    /// Lines to print: the content, or a single placeholder
    pub fn display_lines(&self) -> Vec<&str> {
        match self.state {
            DocumentState::Present => self.lines.iter().map(String::as_str).collect(),
            DocumentState::Missing => vec![MISSING],
            DocumentState::Empty => vec![EMPTY],
            DocumentState::Unreadable => vec![UNREADABLE],
        }
    }
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    let repo_root = config.root();
    let memory_path = config.memory_path();
    log::info!(
        "Status for {} (memory: {})",
        repo_root.display(),
        memory_path.display()
    );

    print_status(&repo_root, &memory_path, &config.status, format)
}

/// Gather and print the status report to stdout
pub fn print_status(repo_root: &Path, memory_path: &Path, settings: &StatusConfig, format: OutputFormat) -> Result<()> {
    let branch = GitBranch::new(repo_root.to_path_buf());
    let snapshot = gather(repo_root, memory_path, &branch, settings);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => render_text(&snapshot, settings, &mut out)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(&snapshot)?)?,
    }
    out.flush().context("Failed to flush status output")
}

/// Collect the report contents; never fails
pub fn gather(
    repo_root: &Path,
    memory_path: &Path,
    branch: &dyn BranchSource,
    settings: &StatusConfig,
) -> StatusSnapshot {
    let branch = branch.branch().unwrap_or_else(|| UNAVAILABLE_BRANCH.to_string());

    let (improvements, skipped_records) = match read_last(memory_path, settings.recent) {
        Ok(read) => (
            read.records.iter().map(ImprovementRecord::from_record).collect(),
            read.skipped,
        ),
        Err(e) => {
            log::warn!("Failed to read memory ledger {}: {:#}", memory_path.display(), e);
            (Vec::new(), 0)
        }
    };

    let documents = settings
        .documents
        .iter()
        .map(|name| preview_document(name, &repo_root.join(name), settings.preview_lines))
        .collect();

    StatusSnapshot {
        branch,
        improvements,
        skipped_records,
        documents,
    }
}

fn preview_document(name: &str, path: &Path, count: usize) -> DocumentPreview {
    let preview = |state, lines| DocumentPreview {
        name: name.to_string(),
        state,
        lines,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return preview(DocumentState::Missing, Vec::new()),
        Err(e) => {
            log::warn!("Cannot open {}: {}", path.display(), e);
            return preview(DocumentState::Unreadable, Vec::new());
        }
    };

    let mut lines = Vec::new();
    for raw in BufReader::new(file).split(b'\n').take(count) {
        match raw {
            Ok(bytes) => lines.push(String::from_utf8_lossy(&bytes).trim_end_matches('\r').to_string()),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                return preview(DocumentState::Unreadable, Vec::new());
            }
        }
    }

    if lines.is_empty() {
        preview(DocumentState::Empty, lines)
    } else {
        preview(DocumentState::Present, lines)
    }
}

/// Write the human-readable report
pub fn render_text<W: Write>(snapshot: &StatusSnapshot, settings: &StatusConfig, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "SELF VIEW".bold())?;
    writeln!(out, "Branch: {}", snapshot.branch)?;
    writeln!(out)?;

    writeln!(out, "{}", "RECENT IMPROVEMENTS".cyan())?;
    if snapshot.improvements.is_empty() {
        writeln!(out, "- {}", NO_HISTORY)?;
    } else {
        for item in &snapshot.improvements {
            writeln!(out, "- {} | {} | {}", item.timestamp, item.intent, item.summary)?;
        }
    }
    if snapshot.skipped_records > 0 {
        writeln!(
            out,
            "  {}",
            format!("({} malformed line(s) skipped)", snapshot.skipped_records).dimmed()
        )?;
    }
    writeln!(out)?;

    for doc in &snapshot.documents {
        writeln!(out, "{} (first {} lines)", doc.name.cyan(), settings.preview_lines)?;
        for line in doc.display_lines() {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
    }

    Ok(())
}
