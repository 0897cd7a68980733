//! Text helpers shared by the post and audience analyses.

use std::sync::LazyLock;

use regex::Regex;

// Unicode-aware by default in the `regex` crate, so `\w` covers Cyrillic.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[а-яёa-z]{3,}\b").expect("valid word regex"));

/// Collapse newlines and whitespace runs into single spaces and trim.
#[must_use]
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Number of `#tag` tokens in `text`.
#[must_use]
pub fn hashtag_count(text: &str) -> usize {
    HASHTAG_RE.find_iter(text).count()
}

/// Character (not byte) length of `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Lowercased Cyrillic/Latin words of at least three letters.
#[must_use]
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
