//! Configuration file support
//!
//! Loads settings from ~/.statelex.conf (or %USERPROFILE%\.statelex.conf on Windows)
//!
//! Format: simple key=value pairs, one per line
//! Lines starting with # are comments
//!
//! Example:
//! ```text
//! # statelex configuration
//! color = true
//! default-language = PHP
//! automaton-dir = /home/me/.config/statelex/automata
//! show-diagnostics = false
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to color terminal output
    pub color: bool,
    /// Automaton used when detection by file extension fails
    pub default_language: Option<String>,
    /// Directory of extra `*.toml` automaton definitions
    pub automaton_dir: Option<PathBuf>,
    /// Report forced advances and unclosed constructs on stderr
    pub show_diagnostics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: true,
            default_language: None,
            automaton_dir: None,
            show_diagnostics: false,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".statelex.conf"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".statelex.conf"))
        }
    }

    /// Load configuration from file
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                log::debug!("reading configuration from {}", path.display());
                let settings = Self::parse(&contents);
                config.apply(&settings);
            }
        }

        config
    }

    /// Parse config file contents into key-value pairs
    fn parse(contents: &str) -> HashMap<String, String> {
        let mut settings = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();
                settings.insert(key, value);
            }
        }

        settings
    }

    /// Apply settings from parsed config
    fn apply(&mut self, settings: &HashMap<String, String>) {
        if let Some(value) = settings.get("color") {
            self.color = parse_bool(value);
        }

        if let Some(value) = settings.get("default-language") {
            if !value.is_empty() {
                self.default_language = Some(value.clone());
            }
        }

        if let Some(value) = settings.get("automaton-dir") {
            if !value.is_empty() {
                self.automaton_dir = Some(PathBuf::from(value));
            }
        }

        if let Some(value) = settings.get("show-diagnostics") {
            self.show_diagnostics = parse_bool(value);
        }
    }
}

/// Parse a boolean value from string
fn parse_bool(s: &str) -> bool {
    let s = s.to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
color = false
Default-Language = PHP
automaton-dir = /tmp/automata
show-diagnostics = yes
no equals sign here
        "#;

        let settings = Config::parse(contents);
        assert_eq!(settings.get("color"), Some(&"false".to_string()));
        assert_eq!(settings.get("default-language"), Some(&"PHP".to_string()));
        assert_eq!(settings.get("automaton-dir"), Some(&"/tmp/automata".to_string()));
        assert_eq!(settings.get("show-diagnostics"), Some(&"yes".to_string()));
        assert_eq!(settings.len(), 4);
    }

    #[test]
    fn test_apply_settings() {
        let mut config = Config::default();
        let mut settings = HashMap::new();
        settings.insert("color".to_string(), "off".to_string());
        settings.insert("default-language".to_string(), "PHP".to_string());
        settings.insert("automaton-dir".to_string(), "/srv/lex".to_string());
        settings.insert("show-diagnostics".to_string(), "true".to_string());
        settings.insert("tab-width".to_string(), "4".to_string());

        config.apply(&settings);

        assert!(!config.color);
        assert_eq!(config.default_language.as_deref(), Some("PHP"));
        assert_eq!(config.automaton_dir, Some(PathBuf::from("/srv/lex")));
        assert!(config.show_diagnostics);
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let mut config = Config::default();
        let settings = Config::parse("default-language =\nautomaton-dir = ");
        config.apply(&settings);
        assert!(config.color);
        assert!(config.default_language.is_none());
        assert!(config.automaton_dir.is_none());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(parse_bool("1"));

        assert!(!parse_bool("false"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("anything"));
    }
}
