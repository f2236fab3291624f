//! Error types for statelex

use thiserror::Error;

/// Result type alias for statelex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading automata or scanning text
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid automaton file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown state `{0}`")]
    UnknownState(String),

    #[error("Duplicate state `{0}`")]
    DuplicateState(String),

    #[error("No {0} state configured")]
    MissingSpecialState(&'static str),

    #[error("State `{state}` boundary {boundary}: invalid regex: {source}")]
    InvalidRegex {
        state: String,
        boundary: usize,
        #[source]
        source: regex::Error,
    },

    #[error("State `{state}` boundary {boundary}: {reason}")]
    InvalidPattern {
        state: String,
        boundary: usize,
        reason: String,
    },

    #[error("State `{state}` boundary {boundary} has no transition")]
    UndefinedTransition { state: String, boundary: usize },

    #[error("State `{state}` boundary {boundary}: {action} transition needs a target state")]
    MissingTarget {
        state: String,
        boundary: usize,
        action: &'static str,
    },

    #[error("State `{state}` boundary {boundary}: unknown {what} `{value}`")]
    UnknownSetting {
        state: String,
        boundary: usize,
        what: &'static str,
        value: String,
    },

    #[error("State `{state}`: unknown flag `{flag}`")]
    UnknownFlag { state: String, flag: String },

    #[error("State `{state}` uses unknown keyword table `{table}`")]
    UnknownKeywordTable { state: String, table: String },

    #[error("Keyword table `{table}`: invalid category `{category}`")]
    InvalidCategory { table: String, category: String },

    #[error("No transition for state `{state}` boundary {boundary} at offset {offset}")]
    MissingTransition {
        state: String,
        boundary: usize,
        offset: usize,
    },

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("{0}")]
    Message(String),
}
