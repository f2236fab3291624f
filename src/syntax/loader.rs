//! TOML automaton definitions
//!
//! A definition file is the compiled form of a language's lexical grammar:
//!
//! ```toml
//! name = "Example"
//! extensions = ["ex"]
//! lookahead = 10
//! initial = "code"
//! return = "code"
//! quit = "end"
//!
//! [keywords.main]
//! case-sensitive = true
//! classes = { 1 = "keyword" }
//! words = { 1 = ["if", "else"] }
//!
//! [[state]]
//! name = "code"
//! boundaries = [
//!     { char = '"', to = "string", action = "descend" },
//!     { regex = "[A-Za-z_]", to = "word", action = "stay", emit = "back" },
//! ]
//!
//! [[state]]
//! name = "string"
//! class = "str"
//! flags = ["string"]
//! boundaries = [{ char = '"', action = "ascend", emit = "current" }]
//! ```
//!
//! Each boundary holds exactly one pattern key (`char`, `literal`, `regex`
//! or `any = true`) plus its transition. A boundary without an `action`
//! has no transition and is rejected when the automaton is built.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::automaton::{Action, Automaton, AutomatonBuilder, Emit, StateFlags, StateId, Transition};
use super::keywords::KeywordTable;
use super::rules::Pattern;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Definition {
    name: String,
    #[serde(default)]
    extensions: Vec<String>,
    lookahead: Option<usize>,
    initial: String,
    #[serde(rename = "return")]
    return_to: String,
    quit: String,
    #[serde(default)]
    keywords: BTreeMap<String, KeywordDef>,
    #[serde(rename = "state", default)]
    states: Vec<StateDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct KeywordDef {
    #[serde(default = "default_case_sensitive")]
    case_sensitive: bool,
    #[serde(default)]
    classes: BTreeMap<String, String>,
    #[serde(default)]
    words: BTreeMap<String, Vec<String>>,
}

fn default_case_sensitive() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StateDef {
    name: String,
    class: Option<String>,
    #[serde(default)]
    flags: Vec<String>,
    keywords: Option<String>,
    payload: Option<String>,
    #[serde(default)]
    boundaries: Vec<BoundaryDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoundaryDef {
    #[serde(rename = "char")]
    character: Option<String>,
    literal: Option<String>,
    regex: Option<String>,
    #[serde(default)]
    any: bool,
    to: Option<String>,
    action: Option<String>,
    emit: Option<String>,
    class: Option<String>,
}

/// Parse and validate a definition from TOML text
pub fn parse(source: &str) -> Result<Automaton> {
    let definition: Definition = toml::from_str(source)?;
    compile(definition)
}

/// Load and validate a definition file
pub fn load_file(path: &Path) -> Result<Automaton> {
    log::debug!("loading automaton from {}", path.display());
    let source = fs::read_to_string(path)?;
    parse(&source)
}

fn compile(definition: Definition) -> Result<Automaton> {
    let mut builder = AutomatonBuilder::new(&definition.name);
    for ext in &definition.extensions {
        builder.add_extension(ext);
    }
    if let Some(lookahead) = definition.lookahead {
        builder.set_lookahead(lookahead);
    }

    for (name, def) in &definition.keywords {
        builder.add_keywords(keyword_table(name, def)?);
    }

    // Declare every state first so boundaries can reference later ones
    let mut ids = Vec::with_capacity(definition.states.len());
    for state in &definition.states {
        ids.push(builder.state(&state.name)?);
    }

    for (state, &id) in definition.states.iter().zip(&ids) {
        if let Some(class) = &state.class {
            builder.set_class(id, class);
        }
        let mut flags = StateFlags::default();
        for flag in &state.flags {
            if !flags.set_by_name(flag) {
                return Err(Error::UnknownFlag {
                    state: state.name.clone(),
                    flag: flag.clone(),
                });
            }
        }
        builder.set_flags(id, flags);
        if let Some(table) = &state.keywords {
            builder.use_keywords(id, table)?;
        }
        if let Some(payload) = &state.payload {
            builder.set_payload(id, payload);
        }

        for (index, def) in state.boundaries.iter().enumerate() {
            let pattern = pattern(&state.name, index, def)?;
            let boundary = builder.boundary(id, pattern);
            if let Some(transition) = transition(&builder, &state.name, index, def)? {
                builder.transition(id, boundary, transition);
            }
        }
    }

    let initial = builder.require(&definition.initial)?;
    let return_to = builder.require(&definition.return_to)?;
    let quit = builder.require(&definition.quit)?;
    builder.set_initial(initial);
    builder.set_return(return_to);
    builder.set_quit(quit);

    builder.build()
}

fn keyword_table(name: &str, def: &KeywordDef) -> Result<KeywordTable> {
    let category = |key: &str| {
        key.parse::<u8>().map_err(|_| Error::InvalidCategory {
            table: name.to_string(),
            category: key.to_string(),
        })
    };

    let mut table = KeywordTable::new(name, def.case_sensitive);
    for (key, label) in &def.classes {
        table.set_class(category(key)?, label);
    }
    for (key, words) in &def.words {
        let category = category(key)?;
        for word in words {
            table.insert(word, category);
        }
    }
    Ok(table)
}

fn pattern(state: &str, boundary: usize, def: &BoundaryDef) -> Result<Pattern> {
    let invalid = |reason: &str| Error::InvalidPattern {
        state: state.to_string(),
        boundary,
        reason: reason.to_string(),
    };

    let kinds = [
        def.character.is_some(),
        def.literal.is_some(),
        def.regex.is_some(),
        def.any,
    ];
    if kinds.iter().filter(|&&set| set).count() != 1 {
        return Err(invalid("expected exactly one of char, literal, regex, any"));
    }

    if let Some(text) = &def.character {
        let mut chars = text.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Pattern::Char(c)),
            _ => Err(invalid("char must be a single character")),
        };
    }
    if let Some(text) = &def.literal {
        if text.is_empty() {
            return Err(invalid("empty literal"));
        }
        return Ok(Pattern::literal(text));
    }
    if let Some(source) = &def.regex {
        return Pattern::regex(source).map_err(|source| Error::InvalidRegex {
            state: state.to_string(),
            boundary,
            source,
        });
    }
    Ok(Pattern::Any)
}

fn transition(
    builder: &AutomatonBuilder,
    state: &str,
    boundary: usize,
    def: &BoundaryDef,
) -> Result<Option<Transition>> {
    let unknown = |what: &'static str, value: &str| Error::UnknownSetting {
        state: state.to_string(),
        boundary,
        what,
        value: value.to_string(),
    };

    let Some(action_name) = &def.action else {
        return Ok(None);
    };
    let action = Action::from_name(action_name).ok_or_else(|| unknown("action", action_name))?;
    let emit = match &def.emit {
        Some(name) => Emit::from_name(name).ok_or_else(|| unknown("emit mode", name))?,
        None => Emit::default(),
    };
    let target: Option<StateId> = match &def.to {
        Some(name) => Some(builder.require(name)?),
        None => None,
    };

    Ok(Some(Transition {
        target,
        action,
        emit,
        class: def.class.clone(),
    }))
}
