//! Keyword classification tables
//!
//! Maps bare identifiers to a small integer category, and each category
//! to the class label its spans receive. Tables are built once and shared
//! between states and scans behind an `Arc`.

use std::borrow::Cow;
use std::collections::HashMap;

/// Identifier text -> category lookup
#[derive(Debug, Clone)]
pub struct KeywordTable {
    name: String,
    case_sensitive: bool,
    words: HashMap<String, u8>,
    classes: HashMap<u8, String>,
}

impl KeywordTable {
    /// Create an empty table
    pub fn new(name: &str, case_sensitive: bool) -> Self {
        Self {
            name: name.to_string(),
            case_sensitive,
            words: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    /// Table name, as referenced from state definitions
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether lookups distinguish ASCII case
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Add a word with its category. A later insert of the same word wins.
    pub fn insert(&mut self, word: &str, category: u8) {
        let key = self.fold(word).into_owned();
        self.words.insert(key, category);
    }

    /// Set the class label spans of `category` receive
    pub fn set_class(&mut self, category: u8, label: &str) {
        self.classes.insert(category, label.to_string());
    }

    /// Look up the category of an identifier
    pub fn category(&self, word: &str) -> Option<u8> {
        self.words.get(self.fold(word).as_ref()).copied()
    }

    /// Class label for a category, if one is configured
    pub fn class_of(&self, category: u8) -> Option<&str> {
        self.classes.get(&category).map(String::as_str)
    }

    /// Class label for an identifier; `None` when it is not a keyword
    /// or its category has no label
    pub fn classify(&self, word: &str) -> Option<&str> {
        self.category(word).and_then(|category| self.class_of(category))
    }

    /// Number of words in the table
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn fold<'w>(&self, word: &'w str) -> Cow<'w, str> {
        if self.case_sensitive || !word.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Borrowed(word)
        } else {
            Cow::Owned(word.to_ascii_lowercase())
        }
    }
}
