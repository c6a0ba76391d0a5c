//! Persona chat
//!
//! Wraps a user message in the persona documents, hands it to an external
//! agent, and keeps an append-only JSONL ledger of every exchange. The
//! `persona status` view reads the same kind of ledger back.

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod persona;
