//! Phrase normalization.
//!
//! The pipeline is lowercase -> tokenize on non-alphanumerics -> drop stop
//! words and single characters -> Snowball stem -> deduplicate preserving
//! first occurrence. Input longer than [`MAX_PHRASE_LEN`] bytes is rejected
//! before any work happens.

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};

use stripdex_core::{Error, Result, MAX_PHRASE_LEN};

/// English stop words dropped before stemming.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "between", "both", "but", "by", "can", "could", "did",
    "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "you", "your",
];

/// Normalize a phrase into an ordered, deduplicated list of keyword stems.
pub fn normalize(phrase: &str) -> Result<Vec<String>> {
    if phrase.len() > MAX_PHRASE_LEN {
        return Err(Error::BadArgument(format!(
            "phrase is too long, max length is {MAX_PHRASE_LEN}"
        )));
    }

    let stemmer = Stemmer::create(Algorithm::English);
    let mut seen = HashSet::new();
    let mut stems = Vec::new();

    for token in phrase
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
    {
        if token.len() < 2 || STOP_WORDS.contains(&token) {
            continue;
        }
        let stem = stemmer.stem(token).into_owned();
        if seen.insert(stem.clone()) {
            stems.push(stem);
        }
    }

    Ok(stems)
}
