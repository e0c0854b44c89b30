//! Hint derivation for quiz prompts.

/// First character of the first whitespace-delimited token of `text`.
///
/// This is the whole hint the trainer offers: the starting letter of the
/// answer's first word. Returns `None` when the text contains no token.
#[must_use]
pub fn hint_from(text: &str) -> Option<char> {
    text.split_whitespace().next().and_then(|t| t.chars().next())
}
