//! statelex - table-driven lexical scanner for syntax highlighting
//!
//! An [`Automaton`] describes a language as states with ordered boundary
//! patterns and a transition for each boundary. The lexer engine walks a
//! complete in-memory text against it and produces a lossless sequence of
//! classified [`Span`]s, keeping a nesting stack for constructs such as
//! string interpolation and heredoc bodies.
//!
//! ```no_run
//! use statelex::{scan, Registry};
//!
//! let registry = Registry::with_builtins()?;
//! let php = registry.resolve("php")?;
//! let result = scan(&php, "<?php echo \"hi {$name}\";")?;
//! for span in &result.spans {
//!     println!("{:?} {:?}", span.class, span.text);
//! }
//! # Ok::<(), statelex::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod syntax;

pub use error::{Error, Result};
pub use syntax::{
    scan, Automaton, AutomatonBuilder, Lexer, Registry, Scan, Span, Termination, Theme,
};
