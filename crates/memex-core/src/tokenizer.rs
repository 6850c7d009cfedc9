//! Term extraction shared by the query builder and the page index.
//!
//! Text is split on every non-alphanumeric character, lowercased, and filtered
//! against a minimum length and a small English stop-word list. Both queries
//! and indexed documents go through the same function so that a query term
//! always matches the indexed form of the same word.

use std::collections::HashSet;

use once_cell::sync::Lazy;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have",
        "if", "in", "into", "is", "it", "its", "no", "not", "of", "on", "or", "so", "such",
        "that", "the", "their", "then", "there", "these", "they", "this", "to", "was", "were",
        "will", "with",
    ]
    .into_iter()
    .collect()
});

/// Whether a lowercased term is a stop word.
pub fn is_stop_word(term: &str) -> bool {
    STOP_WORDS.contains(term)
}

/// Split text into raw lowercase words without filtering.
pub fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// Extract the unique, searchable terms of `text` in first-seen order.
///
/// Words shorter than `min_len` characters and stop words are dropped.
///
/// ```
/// use memex_core::tokenizer::extract_terms;
///
/// let terms = extract_terms("The Rust-lang book: a guide to Rust", 2);
/// assert_eq!(terms, vec!["rust", "lang", "book", "guide"]);
/// ```
pub fn extract_terms(text: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    split_words(text)
        .filter(|word| word.chars().count() >= min_len && !is_stop_word(word))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}
