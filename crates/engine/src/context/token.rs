//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token, floored.
//! The truncation budget (1,048,576 tokens) is calibrated against this
//! exact division, so the heuristic is part of the engine's behavior
//! contract — it must not be swapped for a real tokenizer.
//!
//! All helpers count characters, not bytes, so truncation can never split
//! a multi-byte UTF-8 sequence.

/// Characters assumed per token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds down.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// The substring starting after the first `n` characters.
pub fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

/// The trailing `max_chars` characters of a string (the whole string if
/// it is already short enough).
pub fn tail_chars(s: &str, max_chars: usize) -> &str {
    let total = s.chars().count();
    if total <= max_chars {
        s
    } else {
        skip_chars(s, total - max_chars)
    }
}
