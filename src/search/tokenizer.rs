//! Splits a value's character-sequence form into lower-cased words at their
//! ordinal position, then every distinct substring of each word at least
//! `MIN_INFIX_LEN` characters long. The ordinal position (not a byte
//! offset) is what lets a query-side phrase search check that two words
//! are adjacent: word `i+1` must sit at position `p+1`.

use std::collections::HashSet;

const MIN_INFIX_LEN: usize = 3;

/// Every alphanumeric run in `text`, lower-cased, paired with its 0-based
/// word-ordinal position.
pub fn words(text: &str) -> Vec<(String, usize)> {
    let lower = text.to_lowercase();
    let mut out = Vec::new();
    let mut current = String::new();

    for ch in lower.chars() {
        if ch.is_alphanumeric() {
            current.push(ch);
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }

    out.into_iter().enumerate().map(|(position, word)| (word, position)).collect()
}

/// Every distinct substring of every word in `text`, at least `MIN_INFIX_LEN`
/// long, paired with the word's ordinal position. A word's substrings are
/// deduped against each other (a repeated letter run like "ss" in "grass"
/// would otherwise enqueue the same posting twice).
pub fn infixes(text: &str) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    for (word, position) in words(text) {
        let chars: Vec<char> = word.chars().collect();
        let mut seen = HashSet::new();
        for start in 0..chars.len() {
            for end in (start + MIN_INFIX_LEN)..=chars.len() {
                let substr: String = chars[start..end].iter().collect();
                if seen.insert(substr.clone()) {
                    out.push((substr, position));
                }
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "tokenizer_test.rs"]
mod tokenizer_test;
