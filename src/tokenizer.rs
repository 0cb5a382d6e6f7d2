//! Splits page text into tokens and filters out the ones that do not carry
//! statistical signal (stop-words, single characters, pure digits).
//!
//! Tokenization and filtering are kept as two separate functions on purpose:
//! link/content extraction always sees the unfiltered token sequence, while
//! SimHash and the stats aggregator only ever see the filtered one.

use std::collections::HashSet;

/// Default stop-word list shipped with the crate, used when no
/// `stopwords_file` is configured. Kept short and common; a real corpus run
/// should point `stopwords_file` at a fuller list.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has",
    "he", "in", "is", "it", "its", "of", "on", "that", "the", "to", "was",
    "were", "will", "with", "this", "but", "or", "not", "have", "had",
];

/// Split `text` into lowercased alphanumeric tokens.
///
/// A token is a maximal run of ASCII letters/digits; every other character
/// is a delimiter and is discarded. Order of emission matches order of
/// appearance in `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Drop stop-words, single-character tokens, and pure-digit tokens.
///
/// `tokens` is expected to already be lowercased (i.e. the output of
/// `tokenize`); this function does not re-normalize case.
pub fn filter_tokens<'a>(tokens: &'a [String], stopwords: &HashSet<String>) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|t| {
            t.len() > 1 && !stopwords.contains(t.as_str()) && !t.chars().all(|c| c.is_ascii_digit())
        })
        .map(|t| t.as_str())
        .collect()
}

/// Build the stop-word set the crawler uses, either from a file (one word
/// per line, blank lines and `#` comments ignored) or the built-in default.
pub fn load_stopwords(path: Option<&std::path::Path>) -> std::io::Result<HashSet<String>> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            Ok(text
                .lines()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(|l| l.to_ascii_lowercase())
                .collect())
        }
        None => Ok(DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_alphanumeric() {
        let tokens = tokenize("Hello, world! 123abc_456");
        assert_eq!(tokens, vec!["hello", "world", "123abc", "456"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ,,, ---").is_empty());
    }

    #[test]
    fn idempotent_when_rejoined_with_spaces() {
        let s = "The Quick-Brown Fox, jumps!! over 42 lazy_dogs.";
        let once = tokenize(s);
        let rejoined = once.join(" ");
        let twice = tokenize(&rejoined);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_drops_stopwords_single_chars_and_digits() {
        let stop: HashSet<String> = ["the", "a"].iter().map(|s| s.to_string()).collect();
        let tokens = tokenize("The a cat sat on 42 x mats");
        let filtered = filter_tokens(&tokens, &stop);
        assert_eq!(filtered, vec!["cat", "sat", "on", "mats"]);
    }
}
