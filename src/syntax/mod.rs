//! Table-driven lexical scanning
//!
//! This module provides the automaton model, the delimiter scanner and
//! the lexer engine that turns text into classified spans, plus:
//! - TOML automaton definitions (`loader`)
//! - Built-in automata and a registry for language detection
//! - Themes mapping span classes to terminal styles

mod automaton;
mod builtin;
mod engine;
mod keywords;
pub mod loader;
mod registry;
mod rules;
mod scanner;
mod span;
mod style;

pub use automaton::{
    Action, Automaton, AutomatonBuilder, BoundaryId, Emit, State, StateFlags, StateId,
    Transition, DEFAULT_LOOKAHEAD,
};
pub use engine::{scan, Diagnostic, Lexer, NestingStack, Scan, Termination};
pub use keywords::KeywordTable;
pub use registry::Registry;
pub use rules::Pattern;
pub use scanner::{find_delimiter, Probe};
pub use span::{Position, PositionTracker, Span};
pub use style::{Color, Style, Theme};
