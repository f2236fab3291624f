//! Automaton registry
//!
//! Holds the automata available to a process, keyed by name, and maps
//! file extensions to them for language detection.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::automaton::Automaton;
use super::builtin;
use super::loader;
use crate::error::{Error, Result};

/// Named, shared automata
#[derive(Default)]
pub struct Registry {
    automata: HashMap<String, Arc<Automaton>>,
    /// Extension to automaton name mapping
    extension_map: HashMap<String, String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in automata
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for automaton in builtin::all_automata()? {
            registry.add(automaton);
        }
        Ok(registry)
    }

    /// Add an automaton, replacing any with the same name
    pub fn add(&mut self, automaton: Arc<Automaton>) {
        let name = automaton.name().to_string();
        self.extension_map.retain(|_, owner| *owner != name);
        for ext in automaton.extensions() {
            self.extension_map.insert(ext.to_lowercase(), name.clone());
        }
        log::debug!("registered automaton `{}`", name);
        self.automata.insert(name, automaton);
    }

    /// Load a definition file and register it
    pub fn load_file(&mut self, path: &Path) -> Result<Arc<Automaton>> {
        let automaton = Arc::new(loader::load_file(path)?);
        self.add(Arc::clone(&automaton));
        Ok(automaton)
    }

    /// Load every `*.toml` definition in a directory, in name order.
    /// Returns the number loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }
        Ok(paths.len())
    }

    /// Detect the automaton for a file name
    pub fn detect(&self, filename: &Path) -> Option<&str> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.extension_map.get(&ext).map(|s| s.as_str())
    }

    /// Get an automaton by name, ignoring case
    pub fn get(&self, name: &str) -> Option<Arc<Automaton>> {
        self.automata
            .get(name)
            .or_else(|| {
                self.automata
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, automaton)| automaton)
            })
            .cloned()
    }

    /// Get an automaton by name, failing with `UnknownLanguage`
    pub fn resolve(&self, name: &str) -> Result<Arc<Automaton>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownLanguage(name.to_string()))
    }

    /// List available automata
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.automata.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}
