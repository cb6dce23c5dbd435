// crates/fcmtune-core/src/words.rs
//
// For natural-language input the context order is pinned to the typical word
// length and only alpha is searched.

use crate::defaults;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Maximal runs of word characters.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c)).filter(|w| !w.is_empty())
}

/// Mean word length in characters, `None` when there are no words.
pub fn mean_word_length(text: &str) -> Option<f64> {
    let (count, chars) = words(text).fold((0usize, 0usize), |(n, c), w| (n + 1, c + w.chars().count()));
    if count == 0 {
        return None;
    }
    Some((chars as f64) / (count as f64))
}

/// Rounded mean word length (at least 1), or `WORDS_FALLBACK_K` when the text
/// has no words.
pub fn k_from_word_length(text: &str) -> u32 {
    match mean_word_length(text) {
        Some(mean) => (mean.round_ties_even() as u32).max(1),
        None => defaults::WORDS_FALLBACK_K,
    }
}
