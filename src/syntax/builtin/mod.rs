//! Built-in automata
//!
//! Definitions shipped with the crate, embedded as TOML and parsed on
//! first use.

use std::sync::{Arc, OnceLock};

use super::automaton::Automaton;
use super::loader;
use crate::error::Result;

const PHP_SOURCE: &str = include_str!("php.toml");

/// The PHP automaton
pub fn php() -> Result<Arc<Automaton>> {
    static PHP: OnceLock<Arc<Automaton>> = OnceLock::new();
    if let Some(automaton) = PHP.get() {
        return Ok(Arc::clone(automaton));
    }
    let parsed = Arc::new(loader::parse(PHP_SOURCE)?);
    Ok(Arc::clone(PHP.get_or_init(|| parsed)))
}

/// Get all built-in automata
pub fn all_automata() -> Result<Vec<Arc<Automaton>>> {
    Ok(vec![php()?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::engine::{scan, Scan, Termination};
    use pretty_assertions::assert_eq;

    const QUOTE: Option<&str> = Some("php-quote");
    const VAR: Option<&str> = Some("php-var");
    const NUM: Option<&str> = Some("php-num");
    const XLANG: Option<&str> = Some("xlang");

    fn pieces<'a>(scan: &Scan<'a>) -> Vec<(&'a str, Option<&'a str>)> {
        scan.spans.iter().map(|s| (s.text, s.class)).collect()
    }

    fn first_class(automaton: &Automaton, text: &str) -> Option<String> {
        scan(automaton, text).unwrap().spans[0].class.map(str::to_string)
    }

    #[test]
    fn test_php_is_shared() {
        let first = php().unwrap();
        let second = php().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "PHP");
        assert!(first.extensions().iter().any(|e| e == "php"));
        assert_eq!(first.lookahead(), 32);
        assert_eq!(all_automata().unwrap().len(), 1);
    }

    #[test]
    fn test_interpolated_string() {
        let php = php().unwrap();
        let result = scan(&php, r#""a{$b}c""#).unwrap();
        assert_eq!(
            pieces(&result),
            vec![
                ("\"", QUOTE),
                ("a", QUOTE),
                ("{$", VAR),
                ("b", VAR),
                ("}", VAR),
                ("c", QUOTE),
                ("\"", QUOTE),
            ]
        );
        assert!(result.is_balanced());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_unterminated_string() {
        let php = php().unwrap();
        let result = scan(&php, "\"abc").unwrap();
        assert_eq!(pieces(&result), vec![("\"", QUOTE), ("abc", QUOTE)]);
        assert_eq!(result.final_state, php.state_id("quote-double").unwrap());
        assert_eq!(result.stack, vec![php.state_id("code").unwrap()]);
        assert_eq!(result.termination, Termination::Exhausted);
    }

    #[test]
    fn test_keywords() {
        let php = php().unwrap();
        assert_eq!(first_class(&php, "if").as_deref(), Some("php-keyword1"));
        assert_eq!(first_class(&php, "IF").as_deref(), Some("php-keyword1"));
        assert_eq!(first_class(&php, "strlen").as_deref(), Some("php-keyword2"));
        assert_eq!(first_class(&php, "myVar123").as_deref(), Some("php-ident"));
    }

    #[test]
    fn test_open_tag_and_quit() {
        let php = php().unwrap();
        let text = "<?php echo $x; ?>\n<p>";
        let result = scan(&php, text).unwrap();
        assert_eq!(
            pieces(&result),
            vec![
                ("<?php", XLANG),
                (" ", None),
                ("echo", Some("php-keyword1")),
                (" ", None),
                ("$", VAR),
                ("x", VAR),
                ("; ", None),
                ("?>", XLANG),
                ("\n<p>", XLANG),
            ]
        );
        assert_eq!(result.termination, Termination::Quit { offset: 17 });
        assert!(result.spans.last().unwrap().flags.text);
    }

    #[test]
    fn test_comments() {
        let php = php().unwrap();
        let result = scan(&php, "// note\n$a /* b */ # c").unwrap();
        let comments: Vec<_> = result.spans_with_class("php-comment").map(|s| s.text).collect();
        assert_eq!(comments, vec!["//", " note", "/*", " b ", "*/", "#", " c"]);
        assert!(result.spans_with_class("php-comment").all(|s| s.flags.comment));
        assert!(result.is_balanced());
    }

    #[test]
    fn test_line_comment_stops_at_close_tag() {
        let php = php().unwrap();
        let result = scan(&php, "// x ?>tail").unwrap();
        assert_eq!(
            pieces(&result),
            vec![
                ("//", Some("php-comment")),
                (" x ", Some("php-comment")),
                ("?>", XLANG),
                ("tail", XLANG),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let php = php().unwrap();
        let result = scan(&php, "1.5e-3 + 0x1F + .5;").unwrap();
        assert_eq!(
            pieces(&result),
            vec![
                ("1", NUM),
                (".5", NUM),
                ("e", NUM),
                ("-", NUM),
                ("3", NUM),
                (" + ", None),
                ("0", NUM),
                ("x", NUM),
                ("1F", NUM),
                (" + ", None),
                (".5", NUM),
                (";", None),
            ]
        );
        assert!(result.spans_with_class("php-num").all(|s| s.flags.numeric));
    }

    #[test]
    fn test_letters_after_number() {
        let php = php().unwrap();
        let result = scan(&php, "1a 0xZ").unwrap();
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.spans[1].text, "a");
        assert_eq!(result.spans[1].class, Some("php-ident"));
    }

    #[test]
    fn test_heredoc() {
        let php = php().unwrap();
        let result = scan(&php, "<<<EOT\nHi $name\nEOT;\n").unwrap();
        assert_eq!(
            pieces(&result),
            vec![
                ("<<<EOT\n", QUOTE),
                ("Hi ", QUOTE),
                ("$", VAR),
                ("name", VAR),
                ("\n", QUOTE),
                ("EOT;\n", QUOTE),
            ]
        );
        assert!(result.is_balanced());
    }

    #[test]
    fn test_nowdoc_has_no_variables() {
        let php = php().unwrap();
        let result = scan(&php, "<<<'EOT'\nraw $x\nmore\nEOT;\n").unwrap();
        assert!(result.spans.iter().all(|s| s.class == QUOTE));
        assert!(result.is_balanced());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_escapes_stay_in_string() {
        let php = php().unwrap();
        let result = scan(&php, r#""a\"b\\" . 'c\'d' . "\$e""#).unwrap();
        assert!(result.is_balanced());
        assert!(result.spans_with_class("php-var").next().is_none());
        assert!(result.spans.iter().any(|s| s.text == "\\'" && s.class == QUOTE));
    }

    #[test]
    fn test_well_formed_file_is_balanced() {
        let php = php().unwrap();
        let text = concat!(
            "<?php\n",
            "namespace App;\n",
            "/** Greeter */\n",
            "final class Greeter {\n",
            "    public function greet(string $name): string {\n",
            "        $n = strlen($name) + 0x10;\n",
            "        return \"Hello {$name}, $n chars\" . 'done';\n",
            "    }\n",
            "}\n",
            "echo <<<TXT\nBye $name\nTXT;\n",
            "?>\n",
            "<p>footer</p>\n",
        );
        let result = scan(&php, text).unwrap();
        assert_eq!(result.text(), text);
        assert!(result.is_balanced());
        assert!(result.diagnostics.is_empty());
        assert!(matches!(result.termination, Termination::Quit { .. }));
        assert_eq!(result.spans.last().unwrap().text, "\n<p>footer</p>\n");
    }

    #[test]
    fn test_lossless_on_awkward_input() {
        let php = php().unwrap();
        let inputs = [
            "",
            "$",
            "<?",
            "<<<",
            "{$",
            "\"{$",
            "\"{$a",
            "1e",
            "0x",
            "?>",
            "/*",
            "'\\",
            "<<<EOT\n",
            "<<<EOT\nno end",
            "日本 $ü \"ß{$ç}\"",
            "$$a->b['c'] ?? .5e+",
            "a<?php b",
            "<?php\n$a = \"x{$b['k']}\";\n?>\n<html>",
        ];
        for text in inputs {
            let result = scan(&php, text).unwrap();
            assert_eq!(result.text(), text, "input {:?}", text);
            assert!(result.steps <= 2 * text.len() + 1, "input {:?}", text);
            assert!(result.diagnostics.is_empty(), "input {:?}", text);
        }
    }
}
