use crate::error::PersonaError;

/// Separator placed between personality, boundaries and the user message
pub const SEPARATOR: &str = "\n\n---\n\n";

/// Build the prompt sent to the agent
///
/// The message is inserted verbatim; callers must reject empty messages first.
pub fn compose(personality: &str, boundaries: &str, user_message: &str) -> String {
    let mut prompt =
        String::with_capacity(personality.len() + boundaries.len() + user_message.len() + 2 * SEPARATOR.len());
    prompt.push_str(personality);
    prompt.push_str(SEPARATOR);
    prompt.push_str(boundaries);
    prompt.push_str(SEPARATOR);
    prompt.push_str(user_message);
    prompt
}

/// Join command-line words into a single message and trim it
pub fn normalize_message<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Reject a message that is empty after trimming
pub fn validate_message(message: &str) -> Result<&str, PersonaError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        Err(PersonaError::EmptyMessage)
    } else {
        Ok(trimmed)
    }
}
