//! Splitting text content into staggerable tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Runs of word characters plus common punctuation. `,-_` is a range, so it also
/// covers `/ < = > [ \ ] ^` and the hyphen. Anything else (whitespace, emoji,
/// other symbols) stays plain text between tokens.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[a-zA-Z0-9.,-_"'?!:;#@$%&(){}]+"#).expect("static token pattern")
});

/// A slice of a text node after tokenization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum TextPiece<'a> {
    /// Gets its own wrapper element.
    Token(&'a str),
    /// Stays a plain text node.
    Gap(&'a str),
}

impl<'a> TextPiece<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            TextPiece::Token(s) | TextPiece::Gap(s) => *s,
        }
    }
}

/// Split `text` into tokens and gaps. Concatenating the pieces yields `text`.
pub fn tokenize(text: &str) -> Vec<TextPiece<'_>> {
    let mut pieces = Vec::new();
    let mut cursor = 0;
    for m in TOKEN.find_iter(text) {
        if m.start() > cursor {
            pieces.push(TextPiece::Gap(&text[cursor..m.start()]));
        }
        pieces.push(TextPiece::Token(m.as_str()));
        cursor = m.end();
    }
    if cursor < text.len() {
        pieces.push(TextPiece::Gap(&text[cursor..]));
    }
    pieces
}
