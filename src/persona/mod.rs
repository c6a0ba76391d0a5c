//! Persona documents and prompt composition
//!
//! The identity, personality and boundary files are opaque text. They are
//! read fresh on every invocation and concatenated, never parsed.

pub mod document;
pub mod prompt;

pub use document::{PersonaDocument, load_document};
pub use prompt::{SEPARATOR, compose, normalize_message, validate_message};
