//! Lexer engine
//!
//! Drives the delimiter scanner against an automaton's transition table.
//! Each step scans for the next boundary in the current state, emits the
//! pending lexeme, applies the boundary's transition to the nesting stack
//! and emits the delimiter itself. Every input byte ends up in exactly one
//! span, in order.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;

use super::automaton::{Action, Automaton, BoundaryId, Emit, StateId};
use super::scanner::{self, Probe};
use super::span::{Position, PositionTracker, Span};
use crate::error::{Error, Result};

/// Why a scan stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The whole input was consumed
    Exhausted,
    /// The quit state was entered; the rest of the input from `offset`
    /// was flushed as a single span
    Quit { offset: usize },
}

/// A recoverable anomaly met during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// State whose scanner stalled
    pub state: String,
    pub boundary: BoundaryId,
    /// Byte offset of the forced character
    pub offset: usize,
    pub position: Position,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: scanner for state `{}` stalled on boundary {}; forced one-character advance",
            self.position, self.state, self.boundary
        )
    }
}

/// Stack of enclosing states.
///
/// The bottom frame is the automaton's return state and is never popped:
/// ascending from depth zero lands there instead of failing.
#[derive(Debug, Clone)]
pub struct NestingStack {
    frames: Vec<StateId>,
    base: StateId,
}

impl NestingStack {
    pub fn new(base: StateId) -> Self {
        Self {
            frames: Vec::new(),
            base,
        }
    }

    pub fn push(&mut self, state: StateId) {
        self.frames.push(state);
    }

    /// Pop the innermost enclosing state, or the base frame when empty
    pub fn pop(&mut self) -> StateId {
        self.frames.pop().unwrap_or(self.base)
    }

    pub fn base(&self) -> StateId {
        self.base
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames from outermost to innermost
    pub fn frames(&self) -> &[StateId] {
        &self.frames
    }
}

/// The complete result of scanning one input
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    pub spans: Vec<Span<'a>>,
    pub termination: Termination,
    /// State the engine was in when it stopped
    pub final_state: StateId,
    /// Residual nesting stack, outermost first
    pub stack: Vec<StateId>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of engine steps taken
    pub steps: usize,
}

impl<'a> Scan<'a> {
    /// Concatenation of every span's text
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text).collect()
    }

    /// Whether every nested construct was closed
    pub fn is_balanced(&self) -> bool {
        self.stack.is_empty()
    }

    /// Constructs still open at the end: the residual frames followed by
    /// the final state. Empty when balanced.
    pub fn unclosed(&self) -> Vec<StateId> {
        if self.stack.is_empty() {
            return Vec::new();
        }
        let mut open = self.stack.clone();
        open.push(self.final_state);
        open
    }

    /// Spans carrying a given class label
    pub fn spans_with_class<'s>(&'s self, class: &'s str) -> impl Iterator<Item = &'s Span<'a>> {
        self.spans.iter().filter(move |s| s.class == Some(class))
    }
}

/// Scan `text` to completion
pub fn scan<'a>(automaton: &'a Automaton, text: &'a str) -> Result<Scan<'a>> {
    Lexer::new(automaton, text).run()
}

/// One scan in progress over an immutable automaton and input
pub struct Lexer<'a> {
    automaton: &'a Automaton,
    text: &'a str,
    state: StateId,
    stack: NestingStack,
    cursor: usize,
    pending: VecDeque<Span<'a>>,
    diagnostics: Vec<Diagnostic>,
    positions: PositionTracker,
    steps: usize,
    /// The previous step consumed nothing
    idle: bool,
    termination: Option<Termination>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(automaton: &'a Automaton, text: &'a str) -> Self {
        Self {
            automaton,
            text,
            state: automaton.initial(),
            stack: NestingStack::new(automaton.return_state()),
            cursor: 0,
            pending: VecDeque::new(),
            diagnostics: Vec::new(),
            positions: PositionTracker::new(),
            steps: 0,
            idle: false,
            termination: None,
            failed: false,
        }
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stack(&self) -> &NestingStack {
        &self.stack
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_finished(&self) -> bool {
        self.failed || self.termination.is_some()
    }

    /// Drive the scan to completion
    pub fn run(mut self) -> Result<Scan<'a>> {
        let mut spans = Vec::new();
        while !self.is_finished() {
            self.step()?;
            spans.extend(self.pending.drain(..));
        }
        Ok(Scan {
            spans,
            termination: self.termination.unwrap_or(Termination::Exhausted),
            final_state: self.state,
            stack: self.stack.frames().to_vec(),
            diagnostics: self.diagnostics,
            steps: self.steps,
        })
    }

    /// Perform one engine step, queueing the spans it produces
    pub fn step(&mut self) -> Result<()> {
        if self.is_finished() {
            return Ok(());
        }
        let automaton = self.automaton;
        self.steps += 1;
        let start = self.cursor;

        let probe = scanner::find_delimiter(automaton, self.state, self.text, self.cursor);
        let buffer = probe.buffer();
        if !buffer.is_empty() {
            self.emit_buffer(buffer.clone());
        }
        self.cursor = buffer.end;

        let (boundary, delimiter) = match probe {
            Probe::Exhausted { .. } => {
                self.termination = Some(Termination::Exhausted);
                return Ok(());
            }
            Probe::Boundary {
                boundary,
                delimiter,
                ..
            } => (boundary, delimiter),
        };

        let previous = self.state;
        let transition = match automaton.transition(previous, boundary) {
            Some(transition) => transition,
            None => {
                self.failed = true;
                return Err(Error::MissingTransition {
                    state: automaton.state(previous).name.clone(),
                    boundary,
                    offset: delimiter.start,
                });
            }
        };

        self.state = match (transition.action, transition.target) {
            (Action::Ascend, _) => self.ascend(),
            (Action::Stay, Some(target)) => target,
            (Action::Descend, Some(target)) => {
                self.stack.push(previous);
                target
            }
            (action, None) => {
                self.failed = true;
                return Err(Error::MissingTarget {
                    state: automaton.state(previous).name.clone(),
                    boundary,
                    action: action.name(),
                });
            }
        };

        log::trace!(
            "{} -> {} on boundary {} ({}) at {}, depth {}",
            automaton.state(previous).name,
            automaton.state(self.state).name,
            boundary,
            transition.action.name(),
            delimiter.start,
            self.stack.depth()
        );

        let zero_length = delimiter.is_empty();
        if !zero_length && transition.emit != Emit::Back {
            let owner = match transition.emit {
                Emit::Current => previous,
                _ => self.state,
            };
            let class = transition
                .class
                .as_deref()
                .or_else(|| automaton.state(owner).class.as_deref());
            self.push_span(delimiter.clone(), class, owner);
            self.cursor = delimiter.end;
        }

        if self.state == automaton.quit() {
            self.flush_quit();
            return Ok(());
        }

        if self.cursor == start && (zero_length || self.idle) {
            self.force_advance(previous, boundary);
        }
        self.idle = self.cursor == start;
        Ok(())
    }

    /// Pop to the enclosing state, falling back to the return frame
    fn ascend(&mut self) -> StateId {
        if self.stack.is_empty() {
            log::debug!(
                "nesting stack empty at offset {}, returning to `{}`",
                self.cursor,
                self.automaton.state(self.stack.base()).name
            );
        }
        self.stack.pop()
    }

    /// Emit a lexeme of the current state, classifying keywords
    fn emit_buffer(&mut self, range: Range<usize>) {
        let automaton = self.automaton;
        let source = self.text;
        let state = automaton.state(self.state);
        let text = &source[range.clone()];
        let class = state
            .keywords
            .as_ref()
            .and_then(|table| table.classify(text))
            .or(state.class.as_deref());
        self.push_span(range, class, self.state);
    }

    /// Emit the remainder of the input in the quit state's class
    fn flush_quit(&mut self) {
        let offset = self.cursor;
        if offset < self.text.len() {
            let class = self.automaton.state(self.state).class.as_deref();
            self.push_span(offset..self.text.len(), class, self.state);
            self.cursor = self.text.len();
        }
        self.termination = Some(Termination::Quit { offset });
    }

    /// Consume one character so a stalled scanner cannot loop
    fn force_advance(&mut self, stalled: StateId, boundary: BoundaryId) {
        let Some(ch) = self.text[self.cursor..].chars().next() else {
            return;
        };
        let offset = self.cursor;
        let diagnostic = Diagnostic {
            state: self.automaton.state(stalled).name.clone(),
            boundary,
            offset,
            position: self.positions.advance(self.text, offset),
        };
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);

        let class = self.automaton.state(self.state).class.as_deref();
        self.push_span(offset..offset + ch.len_utf8(), class, self.state);
        self.cursor = offset + ch.len_utf8();
    }

    fn push_span(&mut self, range: Range<usize>, class: Option<&'a str>, state: StateId) {
        let source = self.text;
        self.pending.push_back(Span {
            offset: range.start,
            text: &source[range],
            class,
            state,
            flags: self.automaton.state(state).flags,
        });
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Span<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(span) = self.pending.pop_front() {
                return Some(Ok(span));
            }
            if self.is_finished() {
                return None;
            }
            if let Err(e) = self.step() {
                return Some(Err(e));
            }
        }
    }
}
