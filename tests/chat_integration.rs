//! Integration tests for the `chat-self` entry point
//!
//! These drive the real binary against a fake agent script and check:
//! - the reply is printed and exactly one exchange is appended
//! - empty messages, missing documents and agent failures exit 1
//!   with a one-line diagnostic and leave the ledger untouched

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const SEPARATOR: &str = "\n\n---\n\n";

/// Helper to run chat-self rooted at `root`
fn chat_command(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chat-self"));
    cmd.current_dir(root)
        .env("PERSONA_ROOT", root)
        .env("XDG_DATA_HOME", root.join(".data"))
        .env("XDG_CONFIG_HOME", root.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("PERSONA_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn run_chat(root: &Path, args: &[&str]) -> Output {
    chat_command(root).args(args).output().expect("Failed to execute chat-self")
}

/// Helper to write an executable fake agent
fn write_agent(root: &Path, body: &str) -> PathBuf {
    let path = root.join("fake-agent");
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Helper to setup a root with documents and a config pointing at the agent
fn setup_root(agent_body: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("PERSONALITY.md"), "# PERSONALITY\nCalm and candid.\n").unwrap();
    fs::write(root.join("BOUNDARIES.md"), "# BOUNDARIES\nNever share keys.\n").unwrap();

    let agent = write_agent(root, agent_body);
    fs::write(
        root.join("persona.yaml"),
        format!("agent:\n  program: {}\n  name: self\n", agent.display()),
    )
    .unwrap();
    temp
}

fn ledger(root: &Path) -> PathBuf {
    root.join("chat_history.jsonl")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_chat_prints_reply_and_appends_exchange() {
    let temp = setup_root("printf 'Hello from agent'\n");
    let root = temp.path();

    let output = run_chat(root, &["hi", "there"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello from agent\n");
    assert!(output.stderr.is_empty());

    let content = fs::read_to_string(ledger(root)).unwrap();
    assert_eq!(content.lines().count(), 1);

    let record: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(record["user"], "hi there");
    assert_eq!(record["reply"], "Hello from agent");
    assert_eq!(
        record["system"],
        format!(
            "# PERSONALITY\nCalm and candid.\n{0}# BOUNDARIES\nNever share keys.\n{0}hi there",
            SEPARATOR
        )
    );
    assert!(record["timestamp"].as_str().unwrap().ends_with("+00:00"));
}

#[test]
fn test_chat_passes_prompt_as_message_argument() {
    // Echo back only the prompt tail so the reply proves what the agent received
    let temp = setup_root("printf '%s|%s|%s|%s' \"$1\" \"$2\" \"$3\" \"$4\"\n");
    let output = run_chat(temp.path(), &["ping"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "agent|--agent|self|--message\n");
}

#[test]
fn test_chat_successive_runs_append_in_order() {
    let temp = setup_root("echo ok\n");
    let root = temp.path();

    for message in ["first", "second", "third"] {
        let output = run_chat(root, &[message]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
    }

    let content = fs::read_to_string(ledger(root)).unwrap();
    let users: Vec<String> = content
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["user"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(users, vec!["first", "second", "third"]);
    // The stored reply keeps the agent's own newline
    assert!(content.contains("\"reply\":\"ok\\n\""));
}

#[test]
fn test_chat_empty_message_exits_1_and_leaves_ledger_unchanged() {
    let temp = setup_root("echo should-not-run\n");
    let root = temp.path();
    fs::write(ledger(root), "{\"timestamp\":\"t\",\"user\":\"u\",\"system\":\"s\",\"reply\":\"r\"}\n").unwrap();
    let before = fs::read(ledger(root)).unwrap();

    let output = run_chat(root, &["   "]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "Error: user message is empty.\n");
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read(ledger(root)).unwrap(), before);
}

#[test]
fn test_chat_interactive_prompt() {
    let temp = setup_root("printf 'interactive reply\\n'\n");
    let root = temp.path();

    let mut child = chat_command(root)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"typed at the prompt\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Message: interactive reply\n");

    let content = fs::read_to_string(ledger(root)).unwrap();
    assert!(content.contains("\"user\":\"typed at the prompt\""));
}

#[test]
fn test_chat_interactive_blank_line_is_rejected() {
    let temp = setup_root("echo should-not-run\n");
    let root = temp.path();

    let mut child = chat_command(root)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"  \n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "Error: user message is empty.\n");
    assert!(!ledger(root).exists());
}

#[test]
fn test_chat_missing_document_exits_1() {
    let temp = setup_root("echo should-not-run\n");
    let root = temp.path();
    fs::remove_file(root.join("PERSONALITY.md")).unwrap();

    let output = run_chat(root, &["hello"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("Missing file: "), "stderr: {}", err);
    assert!(err.trim_end().ends_with("PERSONALITY.md"));
    assert_eq!(err.lines().count(), 1);
    assert!(!ledger(root).exists());
}

#[test]
fn test_chat_agent_failure_reports_stderr() {
    let temp = setup_root("echo 'upstream model unavailable' >&2\nexit 3\n");
    let root = temp.path();

    let output = run_chat(root, &["hello"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "Agent error: upstream model unavailable\n");
    assert!(output.stdout.is_empty());
    assert!(!ledger(root).exists());
}

#[test]
fn test_chat_agent_failure_without_stderr_names_exit_code() {
    let temp = setup_root("exit 4\n");
    let root = temp.path();

    let output = run_chat(root, &["hello"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "Agent error: agent exited with code 4\n");
    assert!(!ledger(root).exists());
}

#[test]
fn test_chat_agent_not_found() {
    let temp = setup_root("echo unused\n");
    let root = temp.path();
    fs::write(
        root.join("persona.yaml"),
        "agent:\n  program: persona-test-no-such-agent\n",
    )
    .unwrap();

    let output = run_chat(root, &["hello"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Agent error: "));
    assert!(!ledger(root).exists());
}
