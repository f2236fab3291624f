//! Style types for span rendering
//!
//! A `Theme` maps span class labels to terminal styles. Classes it does
//! not know fall back to a style chosen from the span's state flags, so a
//! newly loaded automaton still renders comments, strings and numbers
//! sensibly without any theme entries of its own.

use std::collections::HashMap;

use super::automaton::StateFlags;

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Class label to style mapping
#[derive(Debug, Clone)]
pub struct Theme {
    classes: HashMap<String, Style>,
    comment: Style,
    string: Style,
    numeric: Style,
}

impl Theme {
    /// A theme with flag fallbacks only
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
            comment: Style::fg(Color::BrightBlack).with_italic(),
            string: Style::fg(Color::Green),
            numeric: Style::fg(Color::Cyan),
        }
    }

    /// Set the style for a class label
    pub fn set(&mut self, class: &str, style: Style) {
        self.classes.insert(class.to_string(), style);
    }

    /// Resolve the style of a span
    pub fn style_for(&self, class: Option<&str>, flags: StateFlags) -> Style {
        if let Some(style) = class.and_then(|c| self.classes.get(c)) {
            return *style;
        }
        if flags.comment {
            self.comment
        } else if flags.string {
            self.string
        } else if flags.numeric {
            self.numeric
        } else {
            Style::default()
        }
    }
}

impl Default for Theme {
    /// Styles for the built-in automata's classes
    fn default() -> Self {
        let mut theme = Self::new();
        theme.set("php-keyword1", Style::fg(Color::Magenta).with_bold());
        theme.set("php-keyword2", Style::fg(Color::Blue));
        theme.set("php-var", Style::fg(Color::Yellow));
        theme.set("php-quote", Style::fg(Color::Green));
        theme.set("php-num", Style::fg(Color::Cyan));
        theme.set("php-comment", Style::fg(Color::BrightBlack).with_italic());
        theme.set("php-ident", Style::default());
        theme.set("xlang", Style::fg(Color::BrightRed));
        theme
    }
}
