//! Boundary patterns
//!
//! Each state owns an ordered list of patterns. The scanner probes them
//! in declared order at every position and the first one that matches
//! ends the current lexeme.

use std::fmt;

use regex::Regex;

/// A boundary pattern, tested at the current scan position
#[derive(Debug, Clone)]
pub enum Pattern {
    /// A single literal character
    Char(char),
    /// A literal substring
    Literal(String),
    /// A regex anchored at the current position, matched inside the lookahead window
    Regex(Regex),
    /// Any single character
    Any,
}

impl Pattern {
    /// Compile an anchored regex pattern
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{})", pattern)).map(Pattern::Regex)
    }

    /// Create a literal pattern, collapsing one-character literals to `Char`
    pub fn literal(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Pattern::Char(c),
            _ => Pattern::Literal(text.to_string()),
        }
    }

    /// Try to match at the start of `rest`.
    ///
    /// `window` is the lookahead prefix of `rest`; regexes only see the
    /// window, literals compare against `rest` directly. Returns the byte
    /// length of the match, which may be zero for regexes that accept the
    /// empty string.
    pub fn match_len(&self, rest: &str, window: &str) -> Option<usize> {
        match self {
            Pattern::Char(c) => match rest.chars().next() {
                Some(first) if first == *c => Some(c.len_utf8()),
                _ => None,
            },
            Pattern::Literal(lit) => rest.starts_with(lit.as_str()).then_some(lit.len()),
            Pattern::Regex(re) => re.find(window).map(|m| m.end()),
            Pattern::Any => rest.chars().next().map(char::len_utf8),
        }
    }

    /// Whether this pattern can never match anything (an empty literal)
    pub fn is_empty_literal(&self) -> bool {
        matches!(self, Pattern::Literal(lit) if lit.is_empty())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Char(c) => write!(f, "{:?}", c),
            Pattern::Literal(lit) => write!(f, "{:?}", lit),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
            Pattern::Any => f.write_str("<any>"),
        }
    }
}
