//! statelex - classify source text with a table-driven lexer
//!
//! Reads a file (or stdin), picks an automaton and writes the text back
//! highlighted, or as a span dump.

use std::env;
use std::fs;
use std::io::{self, BufWriter, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use statelex::config::Config;
use statelex::render;
use statelex::{scan, Automaton, Error, Registry, Result, Theme};

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    language: Option<String>,
    automaton: Option<PathBuf>,
    spans: bool,
    color: Option<bool>,
    diagnostics: bool,
    list: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(options) = parse_args(&args)? else {
        return Ok(());
    };

    let config = Config::load();
    let mut registry = Registry::with_builtins()?;
    if let Some(dir) = &config.automaton_dir {
        let count = registry.load_dir(dir)?;
        log::debug!("loaded {} automata from {}", count, dir.display());
    }

    if options.list {
        for name in registry.list() {
            if let Some(automaton) = registry.get(name) {
                println!("{:<12} {}", name, automaton.extensions().join(", "));
            }
        }
        return Ok(());
    }

    let automaton = select_automaton(&mut registry, &options, &config)?;
    let text = read_input(options.file.as_deref())?;
    let result = scan(&automaton, &text)?;

    let stdout = io::stdout();
    let color = options
        .color
        .unwrap_or(config.color && stdout.is_terminal());
    let mut out = BufWriter::new(stdout.lock());
    if options.spans {
        render::write_span_dump(&mut out, &automaton, &result.spans)?;
    } else if color {
        render::write_colored(&mut out, &result.spans, &Theme::default())?;
    } else {
        render::write_plain(&mut out, &result.spans)?;
    }

    if options.diagnostics || config.show_diagnostics {
        render::write_report(&mut io::stderr(), &automaton, &result)?;
    }

    Ok(())
}

/// Parse arguments. `None` means the request was fully handled (help, version).
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--language" | "-l" => options.language = Some(value(&mut iter, arg)?),
            "--automaton" | "-a" => options.automaton = Some(PathBuf::from(value(&mut iter, arg)?)),
            "--spans" => options.spans = true,
            "--color" => options.color = Some(true),
            "--no-color" => options.color = Some(false),
            "--diagnostics" => options.diagnostics = true,
            "--list" => options.list = true,
            "-" => options.file = None,
            other if other.starts_with('-') => {
                return Err(Error::Message(format!("unknown option `{}`", other)));
            }
            path => {
                if options.file.is_some() {
                    return Err(Error::Message("only one input file may be given".to_string()));
                }
                options.file = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Some(options))
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, option: &str) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| Error::Message(format!("option `{}` needs a value", option)))
}

/// Pick the automaton: explicit file, explicit name, file extension, then
/// the configured default
fn select_automaton(
    registry: &mut Registry,
    options: &Options,
    config: &Config,
) -> Result<Arc<Automaton>> {
    if let Some(path) = &options.automaton {
        return registry.load_file(path);
    }
    if let Some(name) = &options.language {
        return registry.resolve(name);
    }
    if let Some(name) = options.file.as_deref().and_then(|f| registry.detect(f)) {
        return registry.resolve(name);
    }
    if let Some(name) = &config.default_language {
        return registry.resolve(name);
    }
    Err(Error::Message(
        "cannot detect the language; use --language or --automaton".to_string(),
    ))
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_usage() {
    println!("statelex {} - table-driven lexical scanner", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: statelex [OPTIONS] [FILE]");
    println!();
    println!("Reads FILE, or stdin when FILE is absent or `-`.");
    println!();
    println!("Options:");
    println!("  -l, --language NAME   Use the named automaton");
    println!("  -a, --automaton PATH  Load an automaton definition (TOML) and use it");
    println!("      --spans           Print one line per span instead of the text");
    println!("      --color           Force colored output");
    println!("      --no-color        Disable colored output");
    println!("      --diagnostics     Report stalls and unclosed constructs on stderr");
    println!("      --list            List available automata");
    println!("  -h, --help            Show this help message");
    println!("  -V, --version         Show version information");
    println!();
    println!("Settings are read from ~/.statelex.conf");
}

fn print_version() {
    println!("statelex {}", env!("CARGO_PKG_VERSION"));
}
