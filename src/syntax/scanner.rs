//! State delimiter scanner
//!
//! One routine serves every state: starting at the cursor it walks the
//! text a character at a time and, at each position, tests the state's
//! boundary patterns in declared order against a fixed-size lookahead
//! window. The first pattern that matches ends the pending lexeme.

use std::ops::Range;

use super::automaton::{Automaton, BoundaryId, StateId};

/// Outcome of probing for the next boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A boundary matched; `buffer` is the text before it
    Boundary {
        boundary: BoundaryId,
        buffer: Range<usize>,
        delimiter: Range<usize>,
    },
    /// End of input reached without a match
    Exhausted { buffer: Range<usize> },
}

impl Probe {
    /// Byte range of the pending lexeme
    pub fn buffer(&self) -> Range<usize> {
        match self {
            Probe::Boundary { buffer, .. } | Probe::Exhausted { buffer } => buffer.clone(),
        }
    }
}

/// Find the next boundary of `state` at or after byte offset `pos`
pub fn find_delimiter(automaton: &Automaton, state: StateId, text: &str, pos: usize) -> Probe {
    let patterns = automaton.state(state).patterns();
    let lookahead = automaton.lookahead();
    let mut cursor = pos;

    while cursor < text.len() {
        let rest = &text[cursor..];
        let probe_window = window(rest, lookahead);
        for (boundary, pattern) in patterns.iter().enumerate() {
            if let Some(len) = pattern.match_len(rest, probe_window) {
                return Probe::Boundary {
                    boundary,
                    buffer: pos..cursor,
                    delimiter: cursor..cursor + len,
                };
            }
        }
        cursor += rest.chars().next().map_or(1, char::len_utf8);
    }

    Probe::Exhausted {
        buffer: pos..text.len(),
    }
}

/// The first `chars` characters of `rest`
fn window(rest: &str, chars: usize) -> &str {
    match rest.char_indices().nth(chars) {
        Some((end, _)) => &rest[..end],
        None => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::automaton::{AutomatonBuilder, Transition};
    use crate::syntax::rules::Pattern;

    fn automaton() -> (Automaton, StateId) {
        let mut b = AutomatonBuilder::new("Test");
        let code = b.state("code").unwrap();
        b.on(code, Pattern::literal("//"), Transition::stay(code));
        b.on(code, Pattern::Char('/'), Transition::stay(code));
        b.on(code, Pattern::regex(r"\d+").unwrap(), Transition::stay(code));
        b.on(code, Pattern::regex(r"<<<\w+\n").unwrap(), Transition::stay(code));
        b.set_initial(code);
        b.set_return(code);
        b.set_quit(code);
        (b.build().unwrap(), code)
    }

    #[test]
    fn test_buffer_before_boundary() {
        let (a, code) = automaton();
        let probe = find_delimiter(&a, code, "abc 42;", 0);
        assert_eq!(
            probe,
            Probe::Boundary {
                boundary: 2,
                buffer: 0..4,
                delimiter: 4..6,
            }
        );
    }

    #[test]
    fn test_priority_order() {
        let (a, code) = automaton();
        // "//" is declared before "/"
        match find_delimiter(&a, code, "x // y", 0) {
            Probe::Boundary { boundary, delimiter, .. } => {
                assert_eq!(boundary, 0);
                assert_eq!(delimiter, 2..4);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_starts_at_cursor() {
        let (a, code) = automaton();
        match find_delimiter(&a, code, "1 + 2", 1) {
            Probe::Boundary { buffer, delimiter, .. } => {
                assert_eq!(buffer, 1..4);
                assert_eq!(delimiter, 4..5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_exhausted() {
        let (a, code) = automaton();
        let text = "no boundaries here";
        assert_eq!(
            find_delimiter(&a, code, text, 3),
            Probe::Exhausted { buffer: 3..text.len() }
        );
        assert_eq!(find_delimiter(&a, code, text, text.len()).buffer(), 18..18);
    }

    #[test]
    fn test_regex_limited_to_window() {
        let (a, code) = automaton();
        // "<<<" + 7-char label + "\n" is 11 characters, past the 10-character window
        assert!(matches!(
            find_delimiter(&a, code, "<<<LABELXX\nbody", 0),
            Probe::Exhausted { .. }
        ));
        assert!(matches!(
            find_delimiter(&a, code, "<<<EOT\nbody", 0),
            Probe::Boundary { boundary: 3, .. }
        ));
    }

    #[test]
    fn test_multibyte_text() {
        let (a, code) = automaton();
        match find_delimiter(&a, code, "héllo 7", 0) {
            Probe::Boundary { buffer, delimiter, .. } => {
                assert_eq!(buffer, 0..7);
                assert_eq!(delimiter, 7..8);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_window_helper() {
        assert_eq!(window("abcdef", 3), "abc");
        assert_eq!(window("ab", 3), "ab");
        assert_eq!(window("éé", 1), "é");
    }
}
