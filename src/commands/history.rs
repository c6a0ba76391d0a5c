use colored::*;
use eyre::Result;
use std::io::{self, Write};

use crate::config::Config;
use crate::history::{Exchange, HistoryLedger};

pub fn run(count: usize, config: &Config) -> Result<()> {
    let ledger = HistoryLedger::new(config.chat_history_path());
    let (exchanges, skipped) = ledger.recent(count)?;
    log::info!(
        "Listing {} exchange(s) from {}",
        exchanges.len(),
        ledger.path().display()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_recent(&exchanges, skipped, &mut out)?;
    Ok(())
}

fn print_recent<W: Write>(exchanges: &[Exchange], skipped: usize, out: &mut W) -> io::Result<()> {
    writeln!(out, "{} Recent chat exchanges:", "📋".blue())?;
    writeln!(out)?;

    if exchanges.is_empty() {
        writeln!(out, "  {}", "(no chat history yet)".dimmed())?;
    } else {
        for exchange in exchanges {
            print_exchange(exchange, out)?;
        }
    }

    if skipped > 0 {
        writeln!(out)?;
        writeln!(out, "  {}", format!("({} malformed line(s) skipped)", skipped).dimmed())?;
    }

    Ok(())
}

fn print_exchange<W: Write>(exchange: &Exchange, out: &mut W) -> io::Result<()> {
    writeln!(out, "  {} {}", exchange.timestamp.dimmed(), exchange.user_message.bold())?;
    let first_line = exchange.reply.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    writeln!(out, "    → {}", first_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(user: &str, reply: &str) -> Exchange {
        Exchange {
            timestamp: "2026-01-01T00:00:00.000000+00:00".to_string(),
            user_message: user.to_string(),
            system_prompt: "prompt".to_string(),
            reply: reply.to_string(),
        }
    }

    fn render(exchanges: &[Exchange], skipped: usize) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_recent(exchanges, skipped, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_print_recent_empty() {
        let text = render(&[], 0);
        assert!(text.contains("(no chat history yet)"));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn test_print_recent_shows_first_reply_line() {
        let text = render(&[exchange("how are you?", "\nFine, thanks.\nAnd you?\n")], 0);
        assert!(text.contains("how are you?"));
        assert!(text.contains("→ Fine, thanks."));
        assert!(!text.contains("And you?"));
    }

    #[test]
    fn test_print_recent_reports_skipped() {
        let text = render(&[exchange("hi", "hello")], 2);
        assert!(text.contains("(2 malformed line(s) skipped)"));
    }
}
