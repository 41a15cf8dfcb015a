use std::sync::OnceLock;

use regex::Regex;

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Leading word run plus at most one trailing punctuation mark. Anything after
/// the matched prefix is dropped.
///
/// Word characters are letters, numbers and `_`. Combining marks are not word
/// characters, so a decomposed accent ends the word.
fn word_pattern() -> &'static Regex {
    WORD_PATTERN
        .get_or_init(|| Regex::new(r"^([\p{L}\p{N}_]+)([.,!?;:])?").expect("valid regex"))
}

/// Split `text` into word and punctuation tokens, preserving order.
///
/// Words that do not start with a word character pass through unchanged.
pub fn tokenize(text: &str) -> Vec<String> {
    let pattern = word_pattern();
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        match pattern.captures(word) {
            Some(caps) => {
                tokens.push(caps[1].to_string());
                if let Some(punct) = caps.get(2) {
                    tokens.push(punct.as_str().to_string());
                }
            }
            None => tokens.push(word.to_string()),
        }
    }
    tokens
}
