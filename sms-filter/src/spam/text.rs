//! Text normalization and tokenization shared by scoring and matching

use std::collections::HashSet;

/// Strip every character that is not an ASCII letter, digit or space
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// Comparison key: normalized and lowercased
pub fn normalize_key(text: &str) -> String {
    let mut key = normalize(text);
    key.make_ascii_lowercase();
    key
}

/// Split a raw message on single spaces. Consecutive spaces yield empty tokens.
pub fn split_tokens(message: &str) -> impl Iterator<Item = &str> {
    message.split(' ')
}

/// Distinct non-empty comparison keys of a message
pub fn vocabulary(message: &str) -> HashSet<String> {
    normalize_key(message)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
