//! Automaton definitions
//!
//! An `Automaton` is the immutable, validated description of a language:
//! its states, the ordered boundary patterns each state probes for, the
//! transition taken for every boundary, and the keyword tables used to
//! classify bare identifiers. It is produced once by `AutomatonBuilder`
//! (directly or through the TOML loader) and shared read-only by all scans.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::keywords::KeywordTable;
use super::rules::Pattern;
use crate::error::{Error, Result};

/// Lookahead window used when a definition does not set one
pub const DEFAULT_LOOKAHEAD: usize = 10;

/// Index of a state within its automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a boundary pattern within its state
pub type BoundaryId = usize;

/// Classification flags carried by a state and copied onto its spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags {
    /// Plain text, emitted as-is
    pub text: bool,
    /// Comment body
    pub comment: bool,
    /// String literal body
    pub string: bool,
    /// Numeric literal
    pub numeric: bool,
}

impl StateFlags {
    /// Set a flag by name (for definition loading). Returns false for unknown names.
    pub fn set_by_name(&mut self, name: &str) -> bool {
        match name {
            "text" => self.text = true,
            "comment" => self.comment = true,
            "string" => self.string = true,
            "numeric" => self.numeric = true,
            _ => return false,
        }
        true
    }

    pub fn with_comment(mut self) -> Self {
        self.comment = true;
        self
    }

    pub fn with_string(mut self) -> Self {
        self.string = true;
        self
    }

    pub fn with_numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    pub fn with_text(mut self) -> Self {
        self.text = true;
        self
    }
}

/// What a transition does to the nesting stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pop the enclosing state (-1)
    Ascend,
    /// Switch state at the same depth (0)
    Stay,
    /// Push the current state and enter the target (+1)
    Descend,
}

impl Action {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ascend" => Some(Action::Ascend),
            "stay" => Some(Action::Stay),
            "descend" => Some(Action::Descend),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Ascend => "ascend",
            Action::Stay => "stay",
            Action::Descend => "descend",
        }
    }

    /// Change in nesting depth
    pub fn delta(&self) -> i8 {
        match self {
            Action::Ascend => -1,
            Action::Stay => 0,
            Action::Descend => 1,
        }
    }
}

/// How the matched delimiter text is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emit {
    /// Consumed, classed by the state entered
    #[default]
    Next,
    /// Consumed, classed by the state being left
    Current,
    /// Not consumed; rescanned by the state entered
    Back,
}

impl Emit {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "next" => Some(Emit::Next),
            "current" => Some(Emit::Current),
            "back" => Some(Emit::Back),
            _ => None,
        }
    }
}

/// The transition taken when a boundary is found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Next state; ignored by `Ascend`, which returns to the enclosing state
    pub target: Option<StateId>,
    pub action: Action,
    pub emit: Emit,
    /// Class label for the delimiter span, overriding the one `emit` implies
    pub class: Option<String>,
}

impl Transition {
    pub fn ascend() -> Self {
        Self {
            target: None,
            action: Action::Ascend,
            emit: Emit::Next,
            class: None,
        }
    }

    pub fn stay(target: StateId) -> Self {
        Self {
            target: Some(target),
            action: Action::Stay,
            emit: Emit::Next,
            class: None,
        }
    }

    pub fn descend(target: StateId) -> Self {
        Self {
            target: Some(target),
            action: Action::Descend,
            emit: Emit::Next,
            class: None,
        }
    }

    /// Builder: set the delimiter emit mode
    pub fn emit(mut self, emit: Emit) -> Self {
        self.emit = emit;
        self
    }

    /// Builder: set an explicit delimiter class
    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }
}

/// A single lexer state
#[derive(Debug)]
pub struct State {
    pub name: String,
    pub flags: StateFlags,
    /// Default class label for spans of this state
    pub class: Option<String>,
    /// Keyword table consulted for this state's buffers
    pub keywords: Option<Arc<KeywordTable>>,
    /// Opaque data for downstream consumers
    pub payload: Option<String>,
    patterns: Vec<Pattern>,
}

impl State {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: StateFlags::default(),
            class: None,
            keywords: None,
            payload: None,
            patterns: Vec::new(),
        }
    }

    /// Boundary patterns in priority order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// A validated, immutable lexer automaton
#[derive(Debug)]
pub struct Automaton {
    name: String,
    extensions: Vec<String>,
    lookahead: usize,
    states: Vec<State>,
    /// Indexed by `[state][boundary]`; complete after validation
    transitions: Vec<Vec<Transition>>,
    initial: StateId,
    return_state: StateId,
    quit: StateId,
    keywords: HashMap<String, Arc<KeywordTable>>,
}

impl Automaton {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File extensions this language is detected by
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Lookahead window size in characters
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// The state with `id`.
    ///
    /// Panics if `id` was issued for a different automaton; use
    /// `get_state` when that is possible.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    /// The state with `id`, or `None` if it is out of range
    pub fn get_state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Find a state by name
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }

    /// All states with their ids
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }

    /// Transition for a (state, boundary) pair
    pub fn transition(&self, state: StateId, boundary: BoundaryId) -> Option<&Transition> {
        self.transitions.get(state.0).and_then(|row| row.get(boundary))
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Bottom frame of the nesting stack: where an ascend lands when
    /// nothing is left to pop
    pub fn return_state(&self) -> StateId {
        self.return_state
    }

    pub fn quit(&self) -> StateId {
        self.quit
    }

    pub fn keyword_table(&self, name: &str) -> Option<&Arc<KeywordTable>> {
        self.keywords.get(name)
    }
}

/// Builder that assembles and validates an `Automaton`.
///
/// Methods taking a `StateId` expect one returned by this builder's
/// `state` or `require` and panic on an id from elsewhere.
pub struct AutomatonBuilder {
    name: String,
    extensions: Vec<String>,
    lookahead: usize,
    states: Vec<State>,
    transitions: HashMap<(StateId, BoundaryId), Transition>,
    keywords: HashMap<String, Arc<KeywordTable>>,
    initial: Option<StateId>,
    return_state: Option<StateId>,
    quit: Option<StateId>,
}

impl AutomatonBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            lookahead: DEFAULT_LOOKAHEAD,
            states: Vec::new(),
            transitions: HashMap::new(),
            keywords: HashMap::new(),
            initial: None,
            return_state: None,
            quit: None,
        }
    }

    pub fn add_extension(&mut self, ext: &str) {
        self.extensions.push(ext.to_string());
    }

    pub fn set_lookahead(&mut self, chars: usize) {
        self.lookahead = chars.max(1);
    }

    /// Declare a new state
    pub fn state(&mut self, name: &str) -> Result<StateId> {
        if self.state_id(name).is_some() {
            return Err(Error::DuplicateState(name.to_string()));
        }
        self.states.push(State::new(name));
        Ok(StateId(self.states.len() - 1))
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }

    /// Look up a state, failing with `UnknownState`
    pub fn require(&self, name: &str) -> Result<StateId> {
        self.state_id(name)
            .ok_or_else(|| Error::UnknownState(name.to_string()))
    }

    pub fn set_class(&mut self, state: StateId, class: &str) {
        self.states[state.0].class = Some(class.to_string());
    }

    pub fn set_flags(&mut self, state: StateId, flags: StateFlags) {
        self.states[state.0].flags = flags;
    }

    pub fn set_payload(&mut self, state: StateId, payload: &str) {
        self.states[state.0].payload = Some(payload.to_string());
    }

    /// Register a keyword table so states can reference it by name
    pub fn add_keywords(&mut self, table: KeywordTable) -> Arc<KeywordTable> {
        let table = Arc::new(table);
        self.keywords.insert(table.name().to_string(), Arc::clone(&table));
        table
    }

    /// Attach a registered keyword table to a state
    pub fn use_keywords(&mut self, state: StateId, table: &str) -> Result<()> {
        let shared = self.keywords.get(table).cloned().ok_or_else(|| {
            Error::UnknownKeywordTable {
                state: self.states[state.0].name.clone(),
                table: table.to_string(),
            }
        })?;
        self.states[state.0].keywords = Some(shared);
        Ok(())
    }

    /// Append a boundary pattern to a state; returns its id
    pub fn boundary(&mut self, state: StateId, pattern: Pattern) -> BoundaryId {
        let patterns = &mut self.states[state.0].patterns;
        patterns.push(pattern);
        patterns.len() - 1
    }

    /// Set the transition for a (state, boundary) pair
    pub fn transition(&mut self, state: StateId, boundary: BoundaryId, transition: Transition) {
        self.transitions.insert((state, boundary), transition);
    }

    /// Append a boundary together with its transition
    pub fn on(&mut self, state: StateId, pattern: Pattern, transition: Transition) -> BoundaryId {
        let boundary = self.boundary(state, pattern);
        self.transition(state, boundary, transition);
        boundary
    }

    pub fn set_initial(&mut self, state: StateId) {
        self.initial = Some(state);
    }

    pub fn set_return(&mut self, state: StateId) {
        self.return_state = Some(state);
    }

    pub fn set_quit(&mut self, state: StateId) {
        self.quit = Some(state);
    }

    /// Validate and freeze the automaton.
    ///
    /// Every boundary of every state must resolve to a transition, and every
    /// non-ascending transition must name a target.
    pub fn build(mut self) -> Result<Automaton> {
        let initial = self.initial.ok_or(Error::MissingSpecialState("initial"))?;
        let return_state = self.return_state.ok_or(Error::MissingSpecialState("return"))?;
        let quit = self.quit.ok_or(Error::MissingSpecialState("quit"))?;

        let mut transitions = Vec::with_capacity(self.states.len());
        for (index, state) in self.states.iter().enumerate() {
            let id = StateId(index);
            let mut row = Vec::with_capacity(state.patterns.len());
            for (boundary, pattern) in state.patterns.iter().enumerate() {
                if pattern.is_empty_literal() {
                    return Err(Error::InvalidPattern {
                        state: state.name.clone(),
                        boundary,
                        reason: "empty literal".to_string(),
                    });
                }
                let transition = self.transitions.remove(&(id, boundary)).ok_or_else(|| {
                    Error::UndefinedTransition {
                        state: state.name.clone(),
                        boundary,
                    }
                })?;
                match transition.target {
                    None if transition.action != Action::Ascend => {
                        return Err(Error::MissingTarget {
                            state: state.name.clone(),
                            boundary,
                            action: transition.action.name(),
                        });
                    }
                    Some(target) if target.0 >= self.states.len() => {
                        return Err(Error::UnknownState(target.to_string()));
                    }
                    _ => {}
                }
                row.push(transition);
            }
            transitions.push(row);
        }

        let boundaries: usize = transitions.iter().map(Vec::len).sum();
        log::debug!(
            "built automaton `{}`: {} states, {} boundaries, {} keyword tables",
            self.name,
            self.states.len(),
            boundaries,
            self.keywords.len()
        );

        Ok(Automaton {
            name: self.name,
            extensions: self.extensions,
            lookahead: self.lookahead,
            states: self.states,
            transitions,
            initial,
            return_state,
            quit,
            keywords: self.keywords,
        })
    }
}
