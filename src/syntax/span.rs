//! Classified spans and source positions

use std::fmt;

use unicode_width::UnicodeWidthStr;

use super::automaton::{StateFlags, StateId};

/// A classified, contiguous run of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    /// Byte offset of the first character
    pub offset: usize,
    /// The raw text covered by this span
    pub text: &'a str,
    /// Class label, `None` for unclassified text
    pub class: Option<&'a str>,
    /// State the span was emitted for
    pub state: StateId,
    /// Flags of that state
    pub flags: StateFlags,
}

impl<'a> Span<'a> {
    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset just past the span
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.offset && pos < self.end()
    }
}

/// 1-based line and display column of a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Locate a byte offset in `text`. Columns count display width, so
    /// wide characters advance by two.
    pub fn locate(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Self {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].width() + 1,
        }
    }
}

/// Resolves positions for nondecreasing offsets, carrying the line count
/// and column width forward so each text byte is measured once
#[derive(Debug, Clone)]
pub struct PositionTracker {
    offset: usize,
    line: usize,
    width: usize,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self {
            offset: 0,
            line: 1,
            width: 0,
        }
    }

    /// Position of `offset` in `text`. An offset behind the last one
    /// restarts from the beginning of the text.
    pub fn advance(&mut self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        if offset < self.offset {
            *self = Self::new();
        }

        let segment = &text[self.offset..offset];
        match segment.rfind('\n') {
            Some(last) => {
                self.line += segment.matches('\n').count();
                self.width = segment[last + 1..].width();
            }
            None => self.width += segment.width(),
        }
        self.offset = offset;

        Position {
            line: self.line,
            column: self.width + 1,
        }
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::automaton::AutomatonBuilder;

    fn state_id() -> StateId {
        let mut b = AutomatonBuilder::new("Test");
        b.state("only").unwrap()
    }

    #[test]
    fn test_span_bounds() {
        let span = Span {
            offset: 5,
            text: "hello",
            class: Some("word"),
            state: state_id(),
            flags: StateFlags::default(),
        };
        assert_eq!(span.len(), 5);
        assert_eq!(span.end(), 10);
        assert!(!span.contains(4));
        assert!(span.contains(5));
        assert!(span.contains(9));
        assert!(!span.contains(10));
    }

    #[test]
    fn test_position_locate() {
        let text = "ab\ncd\n\nef";
        assert_eq!(Position::locate(text, 0), Position { line: 1, column: 1 });
        assert_eq!(Position::locate(text, 4), Position { line: 2, column: 2 });
        assert_eq!(Position::locate(text, 6), Position { line: 3, column: 1 });
        assert_eq!(Position::locate(text, 100), Position { line: 4, column: 3 });
    }

    #[test]
    fn test_tracker_agrees_with_locate() {
        let text = "ab\n日本x\n\n  é\nlast";
        let mut tracker = PositionTracker::new();
        for offset in (0..=text.len()).filter(|&o| text.is_char_boundary(o)) {
            assert_eq!(tracker.advance(text, offset), Position::locate(text, offset), "offset {}", offset);
        }
    }

    #[test]
    fn test_tracker_restarts_when_moving_back() {
        let text = "a\nbc\nd";
        let mut tracker = PositionTracker::new();
        assert_eq!(tracker.advance(text, 5), Position { line: 3, column: 1 });
        assert_eq!(tracker.advance(text, 3), Position { line: 2, column: 2 });
        assert_eq!(tracker.advance(text, 100), Position { line: 3, column: 2 });
    }

    #[test]
    fn test_position_wide_chars() {
        let text = "日本x";
        // each CJK character is two columns wide
        assert_eq!(Position::locate(text, 6).column, 5);
        assert_eq!(Position::locate(text, 6).to_string(), "1:5");
    }
}
